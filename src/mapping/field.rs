use crate::traits::{Scannable, Slot};

/// How the mapper treats a declared field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Receives a column value.
    Value,
    /// Struct whose fields are looked up under the parent's names.
    Embedded(fn() -> Vec<Field>),
    /// Struct whose fields are looked up as `"<name>.<child>"`.
    Nested(fn() -> Vec<Field>),
}

/// A field declaration: Rust field name, optional column tag, kind.
#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub tag: Option<&'static str>,
    pub kind: FieldKind,
}

// The `accessor` arguments only pin down the field's type, so the macro
// doesn't have to spell it out.
impl Field {
    pub fn value<S, T: Slot>(
        name: &'static str,
        tag: Option<&'static str>,
        _accessor: fn(&S) -> &T,
    ) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Value,
        }
    }

    pub fn embed<S, T: Scannable>(
        name: &'static str,
        tag: Option<&'static str>,
        _accessor: fn(&S) -> &T,
    ) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Embedded(T::fields),
        }
    }

    pub fn embed_opt<S, T: Scannable>(
        name: &'static str,
        tag: Option<&'static str>,
        _accessor: fn(&S) -> &Option<Box<T>>,
    ) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Embedded(T::fields),
        }
    }

    pub fn nest<S, T: Scannable>(
        name: &'static str,
        tag: Option<&'static str>,
        _accessor: fn(&S) -> &T,
    ) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Nested(T::fields),
        }
    }

    pub fn nest_opt<S, T: Scannable>(
        name: &'static str,
        tag: Option<&'static str>,
        _accessor: fn(&S) -> &Option<Box<T>>,
    ) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Nested(T::fields),
        }
    }

    /// External name: the tag if present, otherwise the mapped field name.
    pub fn external_name(&self, name_mapper: fn(&str) -> String) -> String {
        match self.tag {
            Some(tag) => tag.to_string(),
            None => name_mapper(self.name),
        }
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            FieldKind::Value => "value",
            FieldKind::Embedded(_) => "embedded",
            FieldKind::Nested(_) => "nested",
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &kind)
            .finish()
    }
}

/// Field indices leading from a destination root to a target field.
/// Empty means the column has no destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<usize>);

impl FieldPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for FieldPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}
