//! Comparison helpers for `where` / `having` objects.
//!
//! Each helper returns a single-key object such as `{isIn: [...]}` which the
//! predicate parser recognises as a comparison on the column it is keyed
//! under. The same shapes can be written directly as JSON.
//!
//! ```ignore
//! use sqlchain::comparator::{is_in, gt, is_null};
//!
//! qb.where_(Arg::object([("id", is_in([1, 2, 3])), ("age", gt(21)), ("deleted_at", is_null())]));
//! // same as
//! qb.where_(json!({"id": {"isIn": [1, 2, 3]}, "age": {"gt": 21}, "deleted_at": {"isNull": true}}));
//! ```

use crate::arg::Arg;

fn tagged(key: &str, value: impl Into<Arg>) -> Arg {
    Arg::Object(vec![(key.to_string(), value.into())])
}

fn tagged_list<T: Into<Arg>>(key: &str, values: impl IntoIterator<Item = T>) -> Arg {
    tagged(key, Arg::List(values.into_iter().map(Into::into).collect()))
}

/// `column = value`
pub fn eq(value: impl Into<Arg>) -> Arg {
    tagged("eq", value)
}

/// `column != value`
pub fn ne(value: impl Into<Arg>) -> Arg {
    tagged("ne", value)
}

/// `column < value`
pub fn lt(value: impl Into<Arg>) -> Arg {
    tagged("lt", value)
}

/// `column <= value`
pub fn le(value: impl Into<Arg>) -> Arg {
    tagged("le", value)
}

/// `column > value`
pub fn gt(value: impl Into<Arg>) -> Arg {
    tagged("gt", value)
}

/// `column >= value`
pub fn ge(value: impl Into<Arg>) -> Arg {
    tagged("ge", value)
}

/// `column LIKE pattern`
pub fn like(pattern: impl Into<Arg>) -> Arg {
    tagged("like", pattern)
}

/// `column NOT LIKE pattern`
pub fn not_like(pattern: impl Into<Arg>) -> Arg {
    tagged("notLike", pattern)
}

/// `column IN (...)`
pub fn is_in<T: Into<Arg>>(values: impl IntoIterator<Item = T>) -> Arg {
    tagged_list("isIn", values)
}

/// `column NOT IN (...)`
pub fn not_in<T: Into<Arg>>(values: impl IntoIterator<Item = T>) -> Arg {
    tagged_list("notIn", values)
}

/// `column IS NULL`
pub fn is_null() -> Arg {
    tagged("isNull", true)
}

/// `column IS NOT NULL`
pub fn not_null() -> Arg {
    tagged("notNull", true)
}

/// Map a comparator key onto its SQL operator.
pub(crate) fn operator(key: &str) -> Option<&'static str> {
    Some(match key {
        "eq" => "=",
        "ne" => "!=",
        "lt" => "<",
        "le" => "<=",
        "gt" => ">",
        "ge" => ">=",
        "like" => "LIKE",
        "notLike" => "NOT LIKE",
        "isIn" => "IN",
        "notIn" => "NOT IN",
        "isNull" => "IS NULL",
        "notNull" => "IS NOT NULL",
        _ => return None,
    })
}

pub(crate) const COMPARATOR_KEYS: &[&str] = &[
    "eq", "ne", "lt", "le", "gt", "ge", "like", "notLike", "isIn", "notIn", "isNull", "notNull",
];
