use std::sync::Arc;

use crate::error::{PgScanError, Result};
use crate::scanner::Scanner;
use crate::traits::{DatabaseDriver, Scannable};
use crate::types::SqlValue;

/// Runs queries and scans their rows into destinations.
/// Created from a PgScanClient.
pub struct Querier {
    driver: Arc<dyn DatabaseDriver>,
    scanner: Arc<Scanner>,
}

impl Querier {
    pub(crate) fn new(driver: Arc<dyn DatabaseDriver>, scanner: Arc<Scanner>) -> Self {
        Self { driver, scanner }
    }

    /// Fetch the first row of the result.
    /// Fails with [`PgScanError::NoRows`] if the query returned nothing.
    pub async fn fetch_one<T>(&self, sql: &str, params: &[SqlValue]) -> Result<T>
    where
        T: Scannable + Default,
    {
        let mut rows = self.driver.query(sql, params).await?;
        let mut dest = T::default();
        self.scanner.scan_one(rows.as_mut(), &mut dest).await?;
        Ok(dest)
    }

    /// Like [`Querier::fetch_one`], but an empty result is `Ok(None)`.
    pub async fn fetch_optional<T>(&self, sql: &str, params: &[SqlValue]) -> Result<Option<T>>
    where
        T: Scannable + Default,
    {
        match self.fetch_one(sql, params).await {
            Ok(dest) => Ok(Some(dest)),
            Err(PgScanError::NoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch every row of the result.
    pub async fn fetch_all<T>(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<T>>
    where
        T: Scannable + Default,
    {
        let mut rows = self.driver.query(sql, params).await?;
        let result = self.scanner.collect(rows.as_mut()).await;
        rows.close();
        result
    }

    /// Hand each row of the result to `consume` as it is scanned.
    pub async fn for_each<T, C>(&self, sql: &str, params: &[SqlValue], consume: C) -> Result<()>
    where
        T: Scannable + Default,
        C: FnMut(T),
    {
        let mut rows = self.driver.query(sql, params).await?;
        let result = self.scanner.scan_all(rows.as_mut(), consume).await;
        rows.close();
        result
    }
}
