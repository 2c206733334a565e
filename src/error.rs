use thiserror::Error;

/// Error type for pgscan operations
#[derive(Debug, Error)]
pub enum PgScanError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The destination (or a factory's output) cannot receive values.
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// A single-row scan found no rows.
    #[error("no rows in result set")]
    NoRows,

    /// A result column has no matching field in the destination type.
    #[error("missing destination name {column} in {destination}")]
    MissingDestinationField {
        column: String,
        destination: &'static str,
    },

    #[error("duplicate column {column} in result set for {destination}")]
    DuplicateColumn {
        column: String,
        destination: &'static str,
    },

    #[error("Expected {expected} column(s), got {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("no current row to scan")]
    NoCurrentRow,

    #[error("cannot convert {found} into {expected}")]
    Conversion {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot decode column {column}: {message}")]
    Decode { column: usize, message: String },

    /// The column's PostgreSQL type has no `SqlValue` decoding.
    #[error("unsupported column type {type_name} for column {column}")]
    UnsupportedType { column: usize, type_name: String },

    /// Reported by a row source once its stream is exhausted.
    #[error("Row iteration failed: {0}")]
    Iteration(String),
}

/// Result type alias for pgscan operations
pub type Result<T> = std::result::Result<T, PgScanError>;
