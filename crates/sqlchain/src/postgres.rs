//! tokio-postgres adapter.
//!
//! Binds [`Value`]s as query parameters and decodes result rows back into
//! [`Row`]s, so any chain can run against a `tokio_postgres::Client` or
//! `Transaction`:
//!
//! ```ignore
//! let (client, conn) = tokio_postgres::connect(&url, NoTls).await?;
//! tokio::spawn(conn);
//!
//! let users = qb::postgres()
//!     .from("users")
//!     .select("id email")
//!     .where_(("status", "active"))
//!     .fetch_all(&client, &[])
//!     .await?;
//! ```

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::value::{Row, Value};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type, to_sql_checked};
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql(ty, out),
            Value::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                _ => i.to_sql(ty, out),
            },
            Value::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            Value::Text(s) => s.to_sql(ty, out),
            Value::Uuid(u) => u.to_sql(ty, out),
            Value::Timestamp(t) => match *ty {
                Type::TIMESTAMP => t.naive_utc().to_sql(ty, out),
                _ => t.to_sql(ty, out),
            },
            Value::Json(j) => j.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn params(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

fn bytea_text(raw: &[u8]) -> String {
    let mut out = String::with_capacity(2 + raw.len() * 2);
    out.push_str("\\x");
    for b in raw {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Column decoding. Types with no closer [`Value`] form come back as text:
/// NUMERIC keeps its exact digits, dates and times use ISO format, BYTEA is
/// hex with a `\x` prefix, and one-dimensional arrays become JSON arrays.
/// Anything else is read as UTF-8, which covers enums, domains and `citext`.
impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> std::result::Result<Self, BoxError> {
        Ok(match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::from(i16::from_sql(ty, raw)?),
            Type::INT4 => Value::from(i32::from_sql(ty, raw)?),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::FLOAT4 => Value::from(f32::from_sql(ty, raw)?),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Text(Decimal::from_sql(ty, raw)?.to_string()),
            Type::UUID => Value::Uuid(Uuid::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?.and_utc()),
            Type::DATE => Value::Text(NaiveDate::from_sql(ty, raw)?.to_string()),
            Type::TIME => Value::Text(NaiveTime::from_sql(ty, raw)?.to_string()),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::BYTEA => Value::Text(bytea_text(raw)),
            _ => match ty.kind() {
                Kind::Array(_) => {
                    let items = Vec::<Value>::from_sql(ty, raw)?;
                    Value::Json(serde_json::to_value(items)?)
                }
                _ => Value::Text(std::str::from_utf8(raw)?.to_string()),
            },
        })
    }

    fn from_sql_null(_ty: &Type) -> std::result::Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn decode_value(row: &tokio_postgres::Row, idx: usize) -> Result<Value> {
    row.try_get::<_, Value>(idx)
        .map_err(|e| Error::decode(row.columns()[idx].name(), e.to_string()))
}

fn decode_rows(rows: &[tokio_postgres::Row]) -> Result<Vec<Row>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Arc<[String]> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    rows.iter()
        .map(|row| {
            let values = (0..row.len())
                .map(|idx| decode_value(row, idx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Row::new(Arc::clone(&columns), values))
        })
        .collect()
}

macro_rules! impl_executor {
    ($($ty:ty),*) => {
        $(impl Executor for $ty {
            async fn fetch(&self, sql: &str, values: &[Value]) -> Result<Vec<Row>> {
                let params = params(values);
                let rows = self.query(sql, &params).await?;
                decode_rows(&rows)
            }

            async fn execute(&self, sql: &str, values: &[Value]) -> Result<u64> {
                let params = params(values);
                Ok(<$ty>::execute(self, sql, &params).await?)
            }
        })*
    };
}

impl_executor!(tokio_postgres::Client, tokio_postgres::Transaction<'_>);
