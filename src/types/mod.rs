mod raw;
mod sql_value;
mod targets;

pub use raw::RawQueryResult;
pub use sql_value::{FromSqlValue, SqlValue};
pub use targets::Targets;
