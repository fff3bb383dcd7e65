//! `WHERE`, `HAVING` and `SET`.
//!
//! All three parse the same shapes. `WHERE` and `HAVING` accept any
//! comparison; `SET` only assigns. Each binds into its own list so the final
//! parameters come out as set, where, having.

use super::{Clause, split_names};
use crate::arg::Arg;
use crate::chain::Link;
use crate::comparator::{self, COMPARATOR_KEYS};
use crate::context::BindTarget;
use crate::error::QueryBuilderError;
use crate::messages::{self, MessageTable};
use crate::value::Value;

const OPERATORS: &[&str] = &[
    "=", "!=", "<>", "<", "<=", ">", ">=", "LIKE", "NOT LIKE", "ILIKE", "NOT ILIKE", "IN",
    "NOT IN",
];

const PREDICATE_MESSAGES: MessageTable = &[
    (
        "in",
        "The \"<op>\" comparison for query builder \"<method>\" component needs a list of values.",
    ),
    (
        "null",
        "Cannot compare NULL using \"<op>\" in query builder \"<method>\" component.",
    ),
];

/// Canonical spelling of a comparison operator.
fn operator(op: &str) -> Option<&'static str> {
    let normal = op
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    OPERATORS.iter().copied().find(|o| *o == normal)
}

fn value_of(link: &Link<'_>, arg: &Arg) -> Result<Value, QueryBuilderError> {
    arg.to_value().ok_or_else(|| {
        let arg = arg.to_string();
        link.fail("value", &[("arg", arg.as_str())])
    })
}

fn column_name<'a>(link: &Link<'_>, arg: &'a Arg) -> Result<&'a str, QueryBuilderError> {
    arg.as_str().ok_or_else(|| link.fail_arg(arg))
}

/// `"a" = ?` per name, values deferred.
fn names(link: &mut Link<'_>, target: BindTarget, s: &str) {
    for name in split_names(s) {
        let column = link.quote_path(name);
        let fragment = match target {
            BindTarget::Set => link.dialect().format_set_placeholder(&column),
            _ => link.dialect().format_where_placeholder(&column, "="),
        };
        link.push(fragment);
        link.defer(target);
    }
}

/// `column <op> value`. A missing value leaves the placeholder deferred.
fn compare(
    link: &mut Link<'_>,
    target: BindTarget,
    column: &str,
    op: &str,
    value: Option<&Arg>,
) -> Result<(), QueryBuilderError> {
    let Some(op) = operator(op) else {
        return Err(link.fail("operator", &[("op", op)]));
    };
    let quoted = link.quote_path(column);

    if matches!(op, "IN" | "NOT IN") {
        let values = match value {
            None => return Err(link.fail("in", &[("op", op)])),
            Some(Arg::List(items)) => items
                .iter()
                .map(|item| value_of(link, item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => vec![value_of(link, other)?],
        };
        if values.is_empty() {
            link.push(if op == "IN" { "1=0" } else { "1=1" });
            return Ok(());
        }
        let fragment = link
            .dialect()
            .format_where_in_placeholder(&quoted, op, values.len());
        link.push(fragment);
        for v in values {
            link.bind(target, v);
        }
        return Ok(());
    }

    match value {
        None => {
            let fragment = link.dialect().format_where_placeholder(&quoted, op);
            link.push(fragment);
            link.defer(target);
        }
        Some(Arg::Null) => {
            let fragment = match op {
                "=" => link.dialect().format_where_null(&quoted),
                "!=" | "<>" => link.dialect().format_where_not_null(&quoted),
                _ => return Err(link.fail("null", &[("op", op)])),
            };
            link.push(fragment);
        }
        Some(Arg::Raw(sql)) => link.push(format!("{quoted} {op} {sql}")),
        Some(arg) => {
            let v = value_of(link, arg)?;
            let fragment = link.dialect().format_where_placeholder(&quoted, op);
            link.push(fragment);
            link.bind(target, v);
        }
    }
    Ok(())
}

/// `{isIn: [...]}`, `{gt: 3, lt: 9}`, `{isNull: true}`.
fn comparisons(
    link: &mut Link<'_>,
    target: BindTarget,
    column: &str,
    pairs: &[(String, Arg)],
) -> Result<(), QueryBuilderError> {
    if pairs.is_empty() {
        return Err(link.fail_object(pairs));
    }
    for (key, value) in pairs {
        let Some(op) = comparator::operator(key) else {
            let valid = messages::alternatives(COMPARATOR_KEYS);
            return Err(link.fail(
                "comparison",
                &[("keys", key.as_str()), ("valid", valid.as_str())],
            ));
        };
        match op {
            "IS NULL" | "IS NOT NULL" => {
                let negated = matches!(value, Arg::Value(Value::Bool(false)));
                let quoted = link.quote_path(column);
                let fragment = if (op == "IS NULL") != negated {
                    link.dialect().format_where_null(&quoted)
                } else {
                    link.dialect().format_where_not_null(&quoted)
                };
                link.push(fragment);
            }
            _ => compare(link, target, column, op, Some(value))?,
        }
    }
    Ok(())
}

/// A column paired with a plain value, `[op, value?]`, comparator object,
/// raw SQL or null.
fn predicate(
    link: &mut Link<'_>,
    target: BindTarget,
    column: &str,
    value: &Arg,
) -> Result<(), QueryBuilderError> {
    match value {
        Arg::List(items) => match items.as_slice() {
            [op] => {
                let op = column_name(link, op)?;
                compare(link, target, column, op, None)
            }
            [op, v] => {
                let op = column_name(link, op)?;
                compare(link, target, column, op, Some(v))
            }
            _ => Err(link.fail_list(items)),
        },
        Arg::Object(pairs) => comparisons(link, target, column, pairs),
        Arg::Func(_) => Err(link.fail_arg(value)),
        other => compare(link, target, column, "=", Some(other)),
    }
}

fn list(link: &mut Link<'_>, target: BindTarget, items: &[Arg]) -> Result<(), QueryBuilderError> {
    match items {
        [column, value] => {
            let column = column_name(link, column)?;
            predicate(link, target, column, value)
        }
        [column, op, value] => {
            let column = column_name(link, column)?;
            let op = column_name(link, op)?;
            compare(link, target, column, op, Some(value))
        }
        _ => Err(link.fail_list(items)),
    }
}

fn object(
    link: &mut Link<'_>,
    target: BindTarget,
    pairs: &[(String, Arg)],
) -> Result<(), QueryBuilderError> {
    for (column, value) in pairs {
        predicate(link, target, column, value)?;
    }
    Ok(())
}

/// `"column" = ?` for `SET`. Null binds `NULL`; lists and objects bind JSON.
fn assign(link: &mut Link<'_>, column: &str, value: &Arg) -> Result<(), QueryBuilderError> {
    let quoted = link.quote_path(column);
    if let Arg::Raw(sql) = value {
        link.push(format!("{quoted} = {sql}"));
        return Ok(());
    }
    let v = value_of(link, value)?;
    let fragment = link.dialect().format_set_placeholder(&quoted);
    link.push(fragment);
    link.bind(BindTarget::Set, v);
    Ok(())
}

fn value_error(link: &Link<'_>, v: &Value) -> QueryBuilderError {
    let arg = v.to_string();
    link.fail("value", &[("arg", arg.as_str())])
}

/// `WHERE`. Predicates are joined with `AND`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Where;

impl Clause for Where {
    fn method(&self) -> &'static str {
        "where"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("where")
    }

    fn build_order(&self) -> Option<u32> {
        Some(50)
    }

    fn keyword(&self) -> &'static str {
        "WHERE"
    }

    fn joint(&self) -> &'static str {
        " AND "
    }

    fn messages(&self) -> MessageTable {
        PREDICATE_MESSAGES
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        names(link, BindTarget::Where, s);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        list(link, BindTarget::Where, items)
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        object(link, BindTarget::Where, pairs)
    }

    fn resolve_value(&self, link: &mut Link<'_>, v: &Value) -> Result<(), QueryBuilderError> {
        Err(value_error(link, v))
    }
}

/// `HAVING`. Same shapes as [`Where`], bound after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Having;

impl Clause for Having {
    fn method(&self) -> &'static str {
        "having"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("having")
    }

    fn build_order(&self) -> Option<u32> {
        Some(70)
    }

    fn keyword(&self) -> &'static str {
        "HAVING"
    }

    fn joint(&self) -> &'static str {
        " AND "
    }

    fn messages(&self) -> MessageTable {
        PREDICATE_MESSAGES
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        names(link, BindTarget::Having, s);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        list(link, BindTarget::Having, items)
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        object(link, BindTarget::Having, pairs)
    }

    fn resolve_value(&self, link: &mut Link<'_>, v: &Value) -> Result<(), QueryBuilderError> {
        Err(value_error(link, v))
    }
}

/// `SET` for updates. Equality only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Set;

impl Clause for Set {
    fn method(&self) -> &'static str {
        "set"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("set")
    }

    fn build_order(&self) -> Option<u32> {
        Some(45)
    }

    fn keyword(&self) -> &'static str {
        "SET"
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        names(link, BindTarget::Set, s);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        match items {
            [column, value] => {
                let column = column_name(link, column)?;
                assign(link, column, value)
            }
            _ => Err(link.fail_list(items)),
        }
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        for (column, value) in pairs {
            assign(link, column, value)?;
        }
        Ok(())
    }

    fn resolve_value(&self, link: &mut Link<'_>, v: &Value) -> Result<(), QueryBuilderError> {
        Err(value_error(link, v))
    }
}

#[cfg(test)]
mod tests {
    use super::operator;

    #[test]
    fn operators_are_case_and_space_insensitive() {
        assert_eq!(operator("not   in"), Some("NOT IN"));
        assert_eq!(operator("Like"), Some("LIKE"));
        assert_eq!(operator(">="), Some(">="));
        assert_eq!(operator("between"), None);
    }
}
