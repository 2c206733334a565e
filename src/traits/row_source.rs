use async_trait::async_trait;

use crate::error::{PgScanError, Result};
use crate::types::Targets;

/// A cursor over the rows of one query result.
///
/// The scanner only ever moves forward: `next`, then `columns` and `scan`
/// for the current row, and `take_error` once `next` returns `false`.
#[async_trait]
pub trait RowSource: Send {
    /// Advance to the next row. Returns `false` when the result is exhausted
    /// or iteration failed; the failure is then reported by `take_error`.
    async fn next(&mut self) -> bool;

    /// Column names of the result, in order.
    fn columns(&self) -> &[String];

    /// Decode the current row into `targets`, one value per column.
    fn scan(&mut self, targets: &mut Targets<'_>) -> Result<()>;

    /// Error discovered while advancing, if any.
    fn take_error(&mut self) -> Option<PgScanError>;

    /// Release the underlying result. Further calls to `next` return `false`.
    fn close(&mut self);
}
