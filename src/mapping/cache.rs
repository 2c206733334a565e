use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use super::field::FieldPath;
use super::resolve::{lowercase, resolve_paths};
use crate::traits::Scannable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    destination: TypeId,
    columns: Vec<String>,
}

/// Resolved field paths keyed by (destination type, column list).
///
/// The name mapper is fixed at construction, so every entry is resolved with
/// the same normalization. Entries are never evicted. Concurrent misses on the
/// same key may resolve twice; the results are identical so the last write
/// wins harmlessly.
pub struct MappingCache {
    entries: RwLock<HashMap<CacheKey, Arc<[FieldPath]>>>,
    name_mapper: fn(&str) -> String,
}

impl fmt::Debug for MappingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl Default for MappingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingCache {
    /// Cache that lower-cases untagged field names.
    pub fn new() -> Self {
        Self::with_name_mapper(lowercase)
    }

    pub fn with_name_mapper(name_mapper: fn(&str) -> String) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            name_mapper,
        }
    }

    pub fn name_mapper(&self) -> fn(&str) -> String {
        self.name_mapper
    }

    /// Returns the cached paths for `T` and `columns`, resolving them on a miss.
    pub fn get_or_resolve<T: Scannable>(&self, columns: &[String]) -> Arc<[FieldPath]> {
        let key = CacheKey {
            destination: TypeId::of::<T>(),
            columns: columns.to_vec(),
        };

        if let Some(paths) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            trace!(destination = T::type_name(), "field paths cache hit");
            return Arc::clone(paths);
        }

        let paths: Arc<[FieldPath]> =
            resolve_paths(T::fields(), columns, self.name_mapper).into();
        debug!(
            destination = T::type_name(),
            columns = ?columns,
            "resolved field paths"
        );

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&paths));
        paths
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
