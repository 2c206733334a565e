//! pgscan - Scan PostgreSQL rows into structs by column name
//!
//! # Example
//! ```ignore
//! use std::time::SystemTime;
//! use pgscan::{scannable, PgScanClient};
//!
//! #[derive(Default)]
//! struct Entity {
//!     id: String,
//!     created_at: Option<SystemTime>,
//!     some_data: String,
//! }
//!
//! scannable!(Entity { id, created_at, some_data });
//!
//! // Connect to database
//! let client = PgScanClient::connect("postgres://localhost/mydb").await?;
//! let querier = client.querier();
//!
//! // Columns are matched by name, whatever their order
//! let entity: Entity = querier
//!     .fetch_one("SELECT * FROM test WHERE id = $1", &["scan-1".into()])
//!     .await?;
//! ```

pub mod drivers;
pub mod error;
pub mod mapping;
pub mod querier;
pub mod scanner;
pub mod traits;
pub mod types;

mod client;
mod macros;

// Re-export main types for convenient access
pub use client::PgScanClient;
pub use error::{PgScanError, Result};
pub use mapping::{Field, FieldKind, FieldPath, MappingCache};
pub use querier::Querier;
pub use scanner::Scanner;
pub use traits::{DatabaseDriver, FieldMut, RowSource, ScanFields, Scannable, Slot};
pub use types::{FromSqlValue, RawQueryResult, SqlValue, Targets};
