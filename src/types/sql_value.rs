use std::time::SystemTime;

use crate::error::{PgScanError, Result};

/// Represents a SQL value in a driver-agnostic way.
/// Used for query parameters and for decoded column values.
/// Drivers are responsible for converting to and from their native types.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Timestamp(SystemTime),
}

impl SqlValue {
    /// Name of the value's kind, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Text(_) => "text",
            SqlValue::Int16(_) => "int2",
            SqlValue::Int32(_) => "int4",
            SqlValue::Int64(_) => "int8",
            SqlValue::Float32(_) => "float4",
            SqlValue::Float64(_) => "float8",
            SqlValue::Bool(_) => "bool",
            SqlValue::Bytes(_) => "bytea",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i16> for SqlValue {
    fn from(value: i16) -> Self {
        SqlValue::Int16(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float32(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float64(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl From<SystemTime> for SqlValue {
    fn from(value: SystemTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Conversion from a decoded column value into a Rust field type.
///
/// Integer and float conversions only widen; anything else is a
/// [`PgScanError::Conversion`]. `NULL` only converts into `Option<T>`.
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: SqlValue) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, value: &SqlValue) -> Result<T> {
    Err(PgScanError::Conversion {
        expected,
        found: value.kind(),
    })
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        Ok(value)
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => mismatch("String", &other),
        }
    }
}

impl FromSqlValue for i16 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int16(v) => Ok(v),
            other => mismatch("i16", &other),
        }
    }
}

impl FromSqlValue for i32 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int16(v) => Ok(v.into()),
            SqlValue::Int32(v) => Ok(v),
            other => mismatch("i32", &other),
        }
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int16(v) => Ok(v.into()),
            SqlValue::Int32(v) => Ok(v.into()),
            SqlValue::Int64(v) => Ok(v),
            other => mismatch("i64", &other),
        }
    }
}

impl FromSqlValue for f32 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float32(v) => Ok(v),
            other => mismatch("f32", &other),
        }
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float32(v) => Ok(v.into()),
            SqlValue::Float64(v) => Ok(v),
            other => mismatch("f64", &other),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Bool(v) => Ok(v),
            other => mismatch("bool", &other),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Bytes(v) => Ok(v),
            other => mismatch("Vec<u8>", &other),
        }
    }
}

impl FromSqlValue for SystemTime {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Timestamp(v) => Ok(v),
            other => mismatch("SystemTime", &other),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}
