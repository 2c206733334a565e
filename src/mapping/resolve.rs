use std::collections::VecDeque;

use super::field::{Field, FieldKind, FieldPath};

/// Nesting limit; stops `Option<Box<Self>>` shapes from recursing forever.
pub const MAX_DEPTH: usize = 32;

/// Upper bound on fields inspected while resolving a single column.
pub const MAX_VISITED: usize = 4096;

/// Default name normalization for untagged fields.
pub fn lowercase(name: &str) -> String {
    name.to_lowercase()
}

/// Finds the path of the value field whose external name is `column`.
///
/// Fields are visited breadth-first, so a shallower field shadows a deeper one
/// with the same name; within a depth the first declared field wins. Only
/// value fields match. A nested struct is entered only when `column` starts
/// with its dotted prefix, which keeps branching self-referential shapes
/// cheap. Returns an empty path when nothing matches within [`MAX_DEPTH`]
/// levels and [`MAX_VISITED`] fields.
pub fn resolve_path(
    fields: &[Field],
    column: &str,
    name_mapper: fn(&str) -> String,
) -> FieldPath {
    let mut queue: VecDeque<(Vec<Field>, Vec<usize>, Option<String>)> = VecDeque::new();
    queue.push_back((fields.to_vec(), Vec::new(), None));
    let mut visited = 0usize;

    while let Some((fields, parent, prefix)) = queue.pop_front() {
        if parent.len() >= MAX_DEPTH {
            continue;
        }
        for (index, field) in fields.iter().enumerate() {
            visited += 1;
            if visited > MAX_VISITED {
                return FieldPath::default();
            }

            let mut path = parent.clone();
            path.push(index);

            match field.kind {
                FieldKind::Value => {
                    let name = qualify(prefix.as_deref(), field.external_name(name_mapper));
                    if name == column {
                        return FieldPath::new(path);
                    }
                }
                FieldKind::Embedded(children) => {
                    queue.push_back((children(), path, prefix.clone()));
                }
                FieldKind::Nested(children) => {
                    let name = qualify(prefix.as_deref(), field.external_name(name_mapper));
                    if is_under(column, &name) {
                        queue.push_back((children(), path, Some(name)));
                    }
                }
            }
        }
    }

    FieldPath::default()
}

fn qualify(prefix: Option<&str>, name: String) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, name),
        None => name,
    }
}

// "a.b.c" is under "a" and "a.b", not under "a.b.c" or "a.bc".
fn is_under(column: &str, prefix: &str) -> bool {
    column
        .strip_prefix(prefix)
        .map_or(false, |rest| rest.starts_with('.'))
}

/// Resolves one path per column. Unmatched columns get an empty path.
pub fn resolve_paths(
    fields: Vec<Field>,
    columns: &[String],
    name_mapper: fn(&str) -> String,
) -> Vec<FieldPath> {
    columns
        .iter()
        .map(|column| resolve_path(&fields, column, name_mapper))
        .collect()
}

/// Index of the first column with an empty path, if any.
pub fn first_unresolved(paths: &[FieldPath]) -> Option<usize> {
    paths.iter().position(FieldPath::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scannable;
    use crate::traits::Scannable;

    #[derive(Default)]
    struct Audit {
        created_by: String,
        id: i64,
        note: String,
    }

    scannable!(Audit { created_by, id: "audit_id", note: "name" });

    #[derive(Default)]
    struct Address {
        city: String,
    }

    scannable!(Address { city });

    #[derive(Default)]
    struct Account {
        id: String,
        audit: Audit,
        address: Option<Box<Address>>,
        display_name: String,
    }

    scannable!(Account {
        id,
        embed audit,
        nest_opt address: "addr",
        display_name: "name",
    });

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_in_column_order() {
        let paths = resolve_paths(
            Account::fields(),
            &columns(&["name", "id", "created_by", "addr.city"]),
            lowercase,
        );
        assert_eq!(
            paths,
            vec![
                FieldPath::new(vec![3]),
                FieldPath::new(vec![0]),
                FieldPath::new(vec![1, 0]),
                FieldPath::new(vec![2, 0]),
            ]
        );
    }

    #[test]
    fn test_shallower_field_wins() {
        // Audit.note is also tagged "name"; the outer display_name shadows it.
        let paths = resolve_paths(Account::fields(), &columns(&["name", "audit_id"]), lowercase);
        assert_eq!(paths[0], FieldPath::new(vec![3]));
        assert_eq!(paths[1], FieldPath::new(vec![1, 1]));
    }

    #[test]
    fn test_unmatched_column_gets_empty_path() {
        let cols = columns(&["id", "nope", "city"]);
        let paths = resolve_paths(Account::fields(), &cols, lowercase);
        assert_eq!(paths.len(), cols.len());
        assert!(paths[1].is_empty());
        // nested children need their prefix
        assert!(paths[2].is_empty());
        assert_eq!(first_unresolved(&paths), Some(1));
    }

    #[test]
    fn test_struct_fields_are_not_targets() {
        let paths = resolve_paths(Account::fields(), &columns(&["audit", "addr"]), lowercase);
        assert!(paths.iter().all(FieldPath::is_empty));
    }

    #[test]
    fn test_name_mapper_applies_to_untagged_fields_only() {
        fn upper(name: &str) -> String {
            name.to_uppercase()
        }
        let cols = columns(&["ID", "name", "display_name"]);
        let paths = resolve_paths(Account::fields(), &cols, upper);
        assert_eq!(paths[0], FieldPath::new(vec![0]));
        assert_eq!(paths[1], FieldPath::new(vec![3]));
        assert!(paths[2].is_empty());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let cols = columns(&["created_by", "id", "name"]);
        let first = resolve_paths(Account::fields(), &cols, lowercase);
        let second = resolve_paths(Account::fields(), &cols, lowercase);
        assert_eq!(first, second);
    }

    #[derive(Default)]
    struct Node {
        label: String,
        next: Option<Box<Node>>,
    }

    scannable!(Node { label, nest_opt next });

    #[test]
    fn test_self_referential_shape_terminates() {
        let paths = resolve_paths(
            Node::fields(),
            &columns(&["label", "next.label", "next.next.label"]),
            lowercase,
        );
        assert_eq!(
            paths,
            vec![
                FieldPath::new(vec![0]),
                FieldPath::new(vec![1, 0]),
                FieldPath::new(vec![1, 1, 0]),
            ]
        );

        let too_deep = format!("{}label", "next.".repeat(MAX_DEPTH));
        assert!(resolve_path(&Node::fields(), &too_deep, lowercase).is_empty());
    }

    #[derive(Default)]
    struct Tree {
        label: String,
        left: Option<Box<Tree>>,
        right: Option<Box<Tree>>,
    }

    scannable!(Tree { label, nest_opt left, nest_opt right });

    #[test]
    fn test_branching_self_referential_shape_resolves() {
        let deep = format!("{}right.label", "left.".repeat(MAX_DEPTH - 2));
        let paths = resolve_paths(
            Tree::fields(),
            &columns(&["label", "left.right.label", "nope", "right.left", deep.as_str()]),
            lowercase,
        );
        assert_eq!(paths[0], FieldPath::new(vec![0]));
        assert_eq!(paths[1], FieldPath::new(vec![1, 2, 0]));
        assert!(paths[2].is_empty());
        assert!(paths[3].is_empty());

        let mut expected = vec![1; MAX_DEPTH - 2];
        expected.extend([2, 0]);
        assert_eq!(paths[4], FieldPath::new(expected));
    }

    #[derive(Default)]
    struct Mesh {
        id: i64,
        first: Option<Box<Mesh>>,
        second: Option<Box<Mesh>>,
    }

    scannable!(Mesh { id, embed_opt first, embed_opt second });

    #[test]
    fn test_branching_embedded_shape_is_bounded() {
        let paths = resolve_paths(Mesh::fields(), &columns(&["id", "missing"]), lowercase);
        assert_eq!(paths[0], FieldPath::new(vec![0]));
        assert!(paths[1].is_empty());
    }
}
