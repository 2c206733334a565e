use super::SqlValue;

/// Driver-agnostic, fully materialized result of a query.
#[derive(Debug, Clone, Default)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
    /// Error reported once the rows are exhausted
    pub deferred_error: Option<String>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            columns,
            rows,
            deferred_error: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
