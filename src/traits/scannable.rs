use crate::error::Result;
use crate::mapping::Field;
use crate::types::{FromSqlValue, SqlValue};

/// A writable location for a single decoded column value.
pub trait Slot {
    /// Replace the slot's contents with `value`.
    fn assign(&mut self, value: SqlValue) -> Result<()>;
}

impl<T: FromSqlValue> Slot for T {
    fn assign(&mut self, value: SqlValue) -> Result<()> {
        *self = T::from_sql_value(value)?;
        Ok(())
    }
}

/// Writable access to one declared field of a destination.
pub enum FieldMut<'a> {
    /// A leaf field that receives a column value.
    Value(&'a mut dyn Slot),
    /// A struct-valued field whose own fields are addressed further.
    Nested(&'a mut dyn ScanFields),
}

impl<'a> FieldMut<'a> {
    pub fn value<T: Slot>(field: &'a mut T) -> Self {
        FieldMut::Value(field)
    }

    pub fn nested<T: ScanFields>(field: &'a mut T) -> Self {
        FieldMut::Nested(field)
    }

    /// Allocates `T::default()` if the field is empty, then addresses it.
    pub fn nested_opt<T: ScanFields + Default>(field: &'a mut Option<Box<T>>) -> Self {
        FieldMut::Nested(field.get_or_insert_with(Box::default).as_mut())
    }
}

/// Object-safe field access for a destination struct.
///
/// `index` is the position of the field in [`Scannable::fields`].
pub trait ScanFields {
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;
}

/// Trait representing a struct that rows can be scanned into.
/// Implementations are typically generated with [`scannable!`](crate::scannable).
pub trait Scannable: ScanFields + 'static {
    /// Declared fields, in declaration order.
    fn fields() -> Vec<Field>
    where
        Self: Sized;

    /// Name used in diagnostics.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
