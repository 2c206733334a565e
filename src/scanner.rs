use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{PgScanError, Result};
use crate::mapping::{first_unresolved, FieldPath, MappingCache};
use crate::traits::{RowSource, Scannable};
use crate::types::Targets;

/// Scans rows into [`Scannable`] destinations.
///
/// Owns the mapping cache, so field paths for a given destination type and
/// column list are resolved once per scanner.
pub struct Scanner {
    cache: MappingCache,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create a scanner that lower-cases untagged field names.
    pub fn new() -> Self {
        Self {
            cache: MappingCache::new(),
        }
    }

    /// Create a scanner with a custom name normalization for untagged fields.
    pub fn with_name_mapper(name_mapper: fn(&str) -> String) -> Self {
        Self {
            cache: MappingCache::with_name_mapper(name_mapper),
        }
    }

    pub fn cache(&self) -> &MappingCache {
        &self.cache
    }

    /// Field paths for `T`, one per column. Empty paths mark unmatched columns.
    pub fn paths<T: Scannable>(&self, columns: &[String]) -> Arc<[FieldPath]> {
        self.cache.get_or_resolve::<T>(columns)
    }

    /// Scan the first row of `rows` into `dest`.
    ///
    /// Fails with [`PgScanError::NoRows`] if there is no row, unless the row
    /// source reported an error, which is returned instead. `rows` is closed
    /// before returning, whatever the outcome.
    pub async fn scan_one<T: Scannable>(
        &self,
        rows: &mut dyn RowSource,
        dest: &mut T,
    ) -> Result<()> {
        let result = self.scan_first(rows, dest).await;
        rows.close();
        result
    }

    async fn scan_first<T: Scannable>(&self, rows: &mut dyn RowSource, dest: &mut T) -> Result<()> {
        if !rows.next().await {
            return Err(rows.take_error().unwrap_or(PgScanError::NoRows));
        }

        let paths = self.checked_paths::<T>(rows.columns())?;
        let mut targets = Targets::new(dest, &paths, T::type_name());
        rows.scan(&mut targets)
    }

    /// Scan every remaining row, building each destination with `make` and
    /// handing it to `consume`.
    ///
    /// `make` returning `None` fails with [`PgScanError::InvalidDestination`];
    /// the first destination is built before any row is read. Paths are
    /// resolved from the columns reported for the first row and reused for
    /// the rest. Does not close `rows`.
    pub async fn scan_all_with<T, M, C>(
        &self,
        rows: &mut dyn RowSource,
        mut make: M,
        mut consume: C,
    ) -> Result<()>
    where
        T: Scannable,
        M: FnMut() -> Option<T>,
        C: FnMut(T),
    {
        let mut pending = Some(new_destination::<T, M>(&mut make)?);
        let mut resolved: Option<Arc<[FieldPath]>> = None;

        while rows.next().await {
            // Column sets are assumed stable for the whole result.
            if resolved.is_none() {
                resolved = Some(self.checked_paths::<T>(rows.columns())?);
            }
            let paths = resolved.as_deref().unwrap_or_default();

            let mut dest = match pending.take() {
                Some(dest) => dest,
                None => new_destination::<T, M>(&mut make)?,
            };
            rows.scan(&mut Targets::new(&mut dest, paths, T::type_name()))?;
            consume(dest);
        }

        match rows.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// [`Scanner::scan_all_with`] using `T::default()` for each row.
    pub async fn scan_all<T, C>(&self, rows: &mut dyn RowSource, consume: C) -> Result<()>
    where
        T: Scannable + Default,
        C: FnMut(T),
    {
        self.scan_all_with(rows, || Some(T::default()), consume)
            .await
    }

    /// Scan every remaining row into a `Vec`.
    pub async fn collect<T>(&self, rows: &mut dyn RowSource) -> Result<Vec<T>>
    where
        T: Scannable + Default,
    {
        let mut results = Vec::new();
        self.scan_all(rows, |row| results.push(row)).await?;
        Ok(results)
    }

    /// Resolves paths and rejects unmatched or repeated columns.
    fn checked_paths<T: Scannable>(&self, columns: &[String]) -> Result<Arc<[FieldPath]>> {
        let paths = self.paths::<T>(columns);

        if let Some(index) = first_unresolved(&paths) {
            return Err(PgScanError::MissingDestinationField {
                column: columns[index].clone(),
                destination: T::type_name(),
            });
        }

        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(column) = columns.iter().find(|column| !seen.insert(column.as_str())) {
            return Err(PgScanError::DuplicateColumn {
                column: column.clone(),
                destination: T::type_name(),
            });
        }

        Ok(paths)
    }
}

fn new_destination<T, M>(make: &mut M) -> Result<T>
where
    T: Scannable,
    M: FnMut() -> Option<T>,
{
    make().ok_or_else(|| {
        PgScanError::InvalidDestination(format!(
            "destination factory for {} returned nothing",
            T::type_name()
        ))
    })
}
