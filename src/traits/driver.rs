use async_trait::async_trait;

use crate::error::Result;
use crate::traits::RowSource;
use crate::types::SqlValue;

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Connecting to the database
/// - Converting SqlValue parameters to native types
/// - Executing queries and exposing the result as a RowSource
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Execute a SQL query with the given parameters.
    /// Parameters use PostgreSQL-style placeholders ($1, $2, etc.)
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Box<dyn RowSource>>;
}
