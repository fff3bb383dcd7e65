//! Clause arguments.
//!
//! Every clause method takes one or more [`Arg`]s. The variant is the
//! argument *shape* and picks the parser a clause runs: strings are split
//! into names, lists are positional (`[column, value]`, `[table, column,
//! alias]`, ...), objects are keyed. Most callers never build an `Arg` by
//! hand: `&str`, numbers, tuples, arrays, `Vec`s, `Option`s and
//! `serde_json::Value`s all convert.
//!
//! ```ignore
//! use serde_json::json;
//!
//! qb.select("id email");                         // string
//! qb.where_(("name", "Bobby Badger"));           // [column, value]
//! qb.where_(("age", ">", 21));                   // [column, op, value]
//! qb.where_(json!({ "id": { "isIn": [1, 2] } })); // object with comparator
//! qb.select(raw("COUNT(*) AS n"));               // verbatim SQL
//! ```

use crate::chain::Link;
use crate::error::QueryBuilderError;
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Programmatic fragment producer, invoked with the resolving link.
pub type ArgFn = Arc<dyn Fn(&mut Link<'_>) -> Result<(), QueryBuilderError> + Send + Sync>;

/// A clause argument, tagged by shape.
#[derive(Clone)]
pub enum Arg {
    /// Absent value. Contributes nothing at the top level; `NULL` inside a
    /// predicate.
    Null,
    /// String shape.
    Text(String),
    /// Non-string scalar (number, bool, uuid, timestamp).
    Value(Value),
    /// Positional list shape.
    List(Vec<Arg>),
    /// Keyed object shape. Key order is preserved.
    Object(Vec<(String, Arg)>),
    /// Raw SQL, inserted verbatim.
    Raw(RawSql),
    /// Callback producing fragments directly.
    Func(ArgFn),
}

impl Arg {
    /// Build an object argument from key/value pairs.
    pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        Arg::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap a callback.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut Link<'_>) -> Result<(), QueryBuilderError> + Send + Sync + 'static,
    {
        Arg::Func(Arc::new(f))
    }

    /// Short name of the shape, as used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Text(_) => "string",
            Arg::Value(_) => "value",
            Arg::List(_) => "array",
            Arg::Object(_) => "object",
            Arg::Raw(_) => "raw",
            Arg::Func(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Arg]> {
        match self {
            Arg::List(items) => Some(items),
            _ => None,
        }
    }

    /// Integer view of scalar or numeric string arguments.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Arg::Value(v) => v.as_i64(),
            Arg::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Convert a scalar argument into a bind value.
    ///
    /// Lists and objects become JSON values; raw SQL and callbacks have no
    /// value form.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Arg::Null => Some(Value::Null),
            Arg::Text(s) => Some(Value::Text(s.clone())),
            Arg::Value(v) => Some(v.clone()),
            Arg::List(_) | Arg::Object(_) => self.to_json().map(Value::Json),
            Arg::Raw(_) | Arg::Func(_) => None,
        }
    }

    fn to_json(&self) -> Option<serde_json::Value> {
        Some(match self {
            Arg::Null => serde_json::Value::Null,
            Arg::Text(s) => serde_json::Value::String(s.clone()),
            Arg::Value(v) => serde_json::to_value(v).ok()?,
            Arg::List(items) => serde_json::Value::Array(
                items.iter().map(Arg::to_json).collect::<Option<Vec<_>>>()?,
            ),
            Arg::Object(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| v.to_json().map(|j| (k.clone(), j)))
                    .collect::<Option<_>>()?,
            ),
            Arg::Raw(_) | Arg::Func(_) => return None,
        })
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("Null"),
            Arg::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Arg::List(items) => f.debug_tuple("List").field(items).finish(),
            Arg::Object(pairs) => f.debug_tuple("Object").field(pairs).finish(),
            Arg::Raw(r) => f.debug_tuple("Raw").field(&r.0).finish(),
            Arg::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("null"),
            Arg::Text(s) => f.write_str(s),
            Arg::Value(v) => write!(f, "{v}"),
            Arg::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Arg::Object(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Arg::Raw(r) => f.write_str(&r.0),
            Arg::Func(_) => f.write_str("<function>"),
        }
    }
}

/// Verbatim SQL.
///
/// **Warning**: this bypasses quoting and parameterization entirely. Only use
/// it with trusted, hardcoded SQL strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSql(pub(crate) String);

impl RawSql {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create a raw SQL argument.
///
/// **Warning**: the text is inserted as-is. Never pass user input here.
pub fn raw(sql: impl Into<String>) -> RawSql {
    RawSql(sql.into())
}

impl From<RawSql> for Arg {
    fn from(r: RawSql) -> Self {
        Arg::Raw(r)
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Null
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Text(s.clone())
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Arg::Null,
            Value::Text(s) => Arg::Text(s),
            other => Arg::Value(other),
        }
    }
}

macro_rules! impl_arg_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Value(Value::from(v))
            }
        })*
    };
}

impl_arg_from_scalar!(i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, Uuid, DateTime<Utc>);

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Arg>, const N: usize> From<[T; N]> for Arg {
    fn from(items: [T; N]) -> Self {
        Arg::List(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Arg>, B: Into<Arg>> From<(A, B)> for Arg {
    fn from((a, b): (A, B)) -> Self {
        Arg::List(vec![a.into(), b.into()])
    }
}

impl<A: Into<Arg>, B: Into<Arg>, C: Into<Arg>> From<(A, B, C)> for Arg {
    fn from((a, b, c): (A, B, C)) -> Self {
        Arg::List(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Arg>, B: Into<Arg>, C: Into<Arg>, D: Into<Arg>> From<(A, B, C, D)> for Arg {
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Arg::List(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

impl From<serde_json::Value> for Arg {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Arg::Null,
            serde_json::Value::String(s) => Arg::Text(s),
            serde_json::Value::Array(items) => {
                Arg::List(items.into_iter().map(Arg::from).collect())
            }
            serde_json::Value::Object(map) => {
                Arg::Object(map.into_iter().map(|(k, v)| (k, Arg::from(v))).collect())
            }
            scalar => Arg::Value(Value::from(scalar)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tuples_become_lists() {
        let arg = Arg::from(("a", "in", vec![1, 2, 3]));
        let items = arg.as_list().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_str(), Some("a"));
        assert_eq!(items[2].as_list().unwrap().len(), 3);
    }

    #[test]
    fn json_objects_keep_key_order() {
        let arg = Arg::from(json!({"b": 1, "a": null}));
        let Arg::Object(pairs) = arg else {
            panic!("expected object");
        };
        assert_eq!(pairs[0].0, "b");
        assert_eq!(pairs[1].0, "a");
        assert!(pairs[1].1.is_null());
    }

    #[test]
    fn option_none_is_null() {
        assert!(Arg::from(None::<i32>).is_null());
        assert_eq!(Arg::from(Some(5)).as_i64(), Some(5));
    }

    #[test]
    fn display_renders_nested_shapes() {
        let arg = Arg::from(json!({"a": [1, "x"]}));
        assert_eq!(arg.to_string(), "{a: [1, x]}");
    }

    #[test]
    fn list_to_value_is_json() {
        let arg = Arg::from(vec![1, 2]);
        assert_eq!(arg.to_value(), Some(Value::Json(json!([1, 2]))));
        assert_eq!(Arg::from(raw("NOW()")).to_value(), None);
    }
}
