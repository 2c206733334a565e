//! Column-name to field-path resolution.

mod cache;
mod field;
mod resolve;

pub use cache::MappingCache;
pub use field::{Field, FieldKind, FieldPath};
pub use resolve::{
    first_unresolved, lowercase, resolve_path, resolve_paths, MAX_DEPTH, MAX_VISITED,
};
