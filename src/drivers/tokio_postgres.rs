use std::error::Error;
use std::pin::Pin;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use futures_util::TryStreamExt;
use tokio_postgres::types::{FromSql, ToSql, Type};
use tokio_postgres::{Client, NoTls, Row, RowStream};
use tracing::error;

use crate::error::{PgScanError, Result};
use crate::traits::{DatabaseDriver, RowSource};
use crate::types::{SqlValue, Targets};

/// PostgreSQL driver implementation using tokio-postgres.
pub struct TokioPostgresDriver {
    client: Client,
}

impl TokioPostgresDriver {
    /// Connect to a PostgreSQL database.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| PgScanError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Box<dyn RowSource>> {
        // Convert SqlValue params to tokio-postgres compatible types
        let converted_params: Vec<Box<dyn ToSql + Sync + Send>> =
            params.iter().map(sql_value_to_tosql).collect();

        let statement = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| PgScanError::QueryFailed(e.to_string()))?;

        let param_refs: Vec<&(dyn ToSql + Sync)> = converted_params
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let stream = self
            .client
            .query_raw(&statement, param_refs)
            .await
            .map_err(|e| PgScanError::QueryFailed(e.to_string()))?;

        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(Box::new(TokioPostgresRows {
            stream: Some(Box::pin(stream)),
            columns,
            current: None,
            error: None,
        }))
    }
}

/// Streams rows from a tokio-postgres portal.
pub struct TokioPostgresRows {
    stream: Option<Pin<Box<RowStream>>>,
    columns: Vec<String>,
    current: Option<Row>,
    error: Option<PgScanError>,
}

#[async_trait]
impl RowSource for TokioPostgresRows {
    async fn next(&mut self) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        let next = stream.try_next().await;
        match next {
            Ok(Some(row)) => {
                self.current = Some(row);
                true
            }
            Ok(None) => {
                self.close();
                false
            }
            Err(e) => {
                self.error = Some(PgScanError::Iteration(e.to_string()));
                self.close();
                false
            }
        }
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn scan(&mut self, targets: &mut Targets<'_>) -> Result<()> {
        let row = self.current.as_ref().ok_or(PgScanError::NoCurrentRow)?;
        if row.len() != targets.len() {
            return Err(PgScanError::ColumnCount {
                expected: targets.len(),
                actual: row.len(),
            });
        }
        for index in 0..row.len() {
            let value = row_value(row, index)?;
            targets.assign(index, value)?;
        }
        Ok(())
    }

    fn take_error(&mut self) -> Option<PgScanError> {
        self.error.take()
    }

    fn close(&mut self) {
        self.stream = None;
        self.current = None;
    }
}

/// Convert a SqlValue to a boxed ToSql trait object.
fn sql_value_to_tosql(value: &SqlValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        SqlValue::Null => Box::new(None::<String>),
        SqlValue::Text(s) => Box::new(s.clone()),
        SqlValue::Int16(i) => Box::new(*i),
        SqlValue::Int32(i) => Box::new(*i),
        SqlValue::Int64(i) => Box::new(*i),
        SqlValue::Float32(f) => Box::new(*f),
        SqlValue::Float64(f) => Box::new(*f),
        SqlValue::Bool(b) => Box::new(*b),
        SqlValue::Bytes(b) => Box::new(b.clone()),
        SqlValue::Timestamp(t) => Box::new(*t),
    }
}

type BoxError = Box<dyn Error + Sync + Send>;

/// Seconds from the Unix epoch to 2000-01-01, PostgreSQL's date epoch.
const PG_EPOCH_SECS: u64 = 946_684_800;
const SECS_PER_DAY: u64 = 86_400;

/// The undecoded binary value of a column, accepted for any type.
struct RawValue<'a>(&'a [u8]);

impl<'a> FromSql<'a> for RawValue<'a> {
    fn from_sql(_: &Type, raw: &'a [u8]) -> std::result::Result<Self, BoxError> {
        Ok(RawValue(raw))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

/// Decode the value at `index` according to its column type.
///
/// Text-like, json/jsonb and uuid columns decode to `SqlValue::Text`, `date`
/// to a midnight `SqlValue::Timestamp`. Other types without a matching
/// variant (numeric, arrays, ranges, ...) fail with
/// [`PgScanError::UnsupportedType`]; cast them in SQL (`::text`) to scan them.
fn row_value(row: &Row, index: usize) -> Result<SqlValue> {
    let ty = row.columns()[index].type_();
    let decode_error = |message: String| PgScanError::Decode {
        column: index,
        message,
    };

    let raw = row
        .try_get::<_, Option<RawValue<'_>>>(index)
        .map_err(|e| decode_error(e.to_string()))?;
    let Some(RawValue(raw)) = raw else {
        return Ok(SqlValue::Null);
    };

    match decode_value(ty, raw) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(PgScanError::UnsupportedType {
            column: index,
            type_name: ty.name().to_string(),
        }),
        Err(e) => Err(decode_error(e.to_string())),
    }
}

/// Decode a non-NULL binary value. `Ok(None)` means the type is unsupported.
fn decode_value(ty: &Type, raw: &[u8]) -> std::result::Result<Option<SqlValue>, BoxError> {
    let value = if *ty == Type::BOOL {
        SqlValue::Bool(bool::from_sql(ty, raw)?)
    } else if *ty == Type::INT2 {
        SqlValue::Int16(i16::from_sql(ty, raw)?)
    } else if *ty == Type::INT4 {
        SqlValue::Int32(i32::from_sql(ty, raw)?)
    } else if *ty == Type::INT8 {
        SqlValue::Int64(i64::from_sql(ty, raw)?)
    } else if *ty == Type::OID {
        SqlValue::Int64(u32::from_sql(ty, raw)?.into())
    } else if *ty == Type::FLOAT4 {
        SqlValue::Float32(f32::from_sql(ty, raw)?)
    } else if *ty == Type::FLOAT8 {
        SqlValue::Float64(f64::from_sql(ty, raw)?)
    } else if *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
        || *ty == Type::UNKNOWN
        || *ty == Type::JSON
    {
        SqlValue::Text(String::from_sql(&Type::TEXT, raw)?)
    } else if *ty == Type::JSONB {
        // jsonb is sent as a version byte followed by the json text
        match raw.split_first() {
            Some((&1, body)) => SqlValue::Text(String::from_sql(&Type::TEXT, body)?),
            _ => return Err("unsupported jsonb version".into()),
        }
    } else if *ty == Type::UUID {
        SqlValue::Text(format_uuid(raw)?)
    } else if *ty == Type::BYTEA {
        SqlValue::Bytes(Vec::<u8>::from_sql(ty, raw)?)
    } else if *ty == Type::TIMESTAMP || *ty == Type::TIMESTAMPTZ {
        SqlValue::Timestamp(SystemTime::from_sql(ty, raw)?)
    } else if *ty == Type::DATE {
        SqlValue::Timestamp(date_to_time(i32::from_sql(&Type::INT4, raw)?)?)
    } else {
        return Ok(None);
    };

    Ok(Some(value))
}

fn format_uuid(raw: &[u8]) -> std::result::Result<String, BoxError> {
    if raw.len() != 16 {
        return Err(format!("invalid uuid length {}", raw.len()).into());
    }
    let hex: Vec<String> = raw.iter().map(|b| format!("{:02x}", b)).collect();
    Ok(format!(
        "{}-{}-{}-{}-{}",
        hex[0..4].concat(),
        hex[4..6].concat(),
        hex[6..8].concat(),
        hex[8..10].concat(),
        hex[10..16].concat()
    ))
}

fn date_to_time(days: i32) -> std::result::Result<SystemTime, BoxError> {
    let epoch = SystemTime::UNIX_EPOCH + Duration::from_secs(PG_EPOCH_SECS);
    let offset = Duration::from_secs(u64::from(days.unsigned_abs()) * SECS_PER_DAY);
    let time = if days >= 0 {
        epoch.checked_add(offset)
    } else {
        epoch.checked_sub(offset)
    };
    time.ok_or_else(|| "date out of range".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg_epoch() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(PG_EPOCH_SECS)
    }

    fn decode(ty: Type, raw: &[u8]) -> Option<SqlValue> {
        decode_value(&ty, raw).unwrap()
    }

    #[test]
    fn test_decode_numeric_types() {
        assert_eq!(decode(Type::BOOL, &[1]), Some(SqlValue::Bool(true)));
        assert_eq!(decode(Type::INT2, &7i16.to_be_bytes()), Some(SqlValue::Int16(7)));
        assert_eq!(decode(Type::INT4, &42i32.to_be_bytes()), Some(SqlValue::Int32(42)));
        assert_eq!(decode(Type::INT8, &(-3i64).to_be_bytes()), Some(SqlValue::Int64(-3)));
        assert_eq!(decode(Type::OID, &9u32.to_be_bytes()), Some(SqlValue::Int64(9)));
        assert_eq!(decode(Type::FLOAT8, &1.5f64.to_be_bytes()), Some(SqlValue::Float64(1.5)));
    }

    #[test]
    fn test_decode_text_like_types() {
        for ty in [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::JSON] {
            assert_eq!(decode(ty, b"{\"a\":1}"), Some(SqlValue::Text("{\"a\":1}".into())));
        }
        assert_eq!(decode(Type::JSONB, b"\x01[1]"), Some(SqlValue::Text("[1]".into())));
        assert!(decode_value(&Type::JSONB, b"\x02[1]").is_err());
    }

    #[test]
    fn test_decode_uuid() {
        let raw: Vec<u8> = (0u8..16).collect();
        assert_eq!(
            decode(Type::UUID, &raw),
            Some(SqlValue::Text("00010203-0405-0607-0809-0a0b0c0d0e0f".into()))
        );
        assert!(decode_value(&Type::UUID, &raw[..4]).is_err());
    }

    #[test]
    fn test_decode_time_types() {
        assert_eq!(
            decode(Type::TIMESTAMP, &0i64.to_be_bytes()),
            Some(SqlValue::Timestamp(pg_epoch()))
        );
        assert_eq!(
            decode(Type::DATE, &1i32.to_be_bytes()),
            Some(SqlValue::Timestamp(pg_epoch() + Duration::from_secs(SECS_PER_DAY)))
        );
        assert_eq!(
            decode(Type::DATE, &(-1i32).to_be_bytes()),
            Some(SqlValue::Timestamp(pg_epoch() - Duration::from_secs(SECS_PER_DAY)))
        );
    }

    #[test]
    fn test_unsupported_types_are_reported() {
        assert_eq!(decode(Type::NUMERIC, &[0, 0, 0, 0, 0, 0, 0, 0]), None);
        assert_eq!(decode(Type::INT4_ARRAY, &[]), None);
    }

    #[test]
    fn test_truncated_value_is_a_decode_error() {
        assert!(decode_value(&Type::INT8, &[0, 1]).is_err());
    }

    #[test]
    fn test_params_keep_their_value() {
        let cases = [
            (SqlValue::Null, "None"),
            (SqlValue::Text("a".into()), "\"a\""),
            (SqlValue::Int16(1), "1"),
            (SqlValue::Int32(2), "2"),
            (SqlValue::Int64(3), "3"),
            (SqlValue::Float64(0.5), "0.5"),
            (SqlValue::Bool(true), "true"),
            (SqlValue::Bytes(vec![1, 2]), "[1, 2]"),
        ];
        for (value, expected) in cases {
            assert_eq!(format!("{:?}", sql_value_to_tosql(&value)), expected);
        }
    }
}
