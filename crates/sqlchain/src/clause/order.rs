//! `GROUP BY` and `ORDER BY`.

use super::{Clause, field, only_keys, split_names};
use crate::arg::Arg;
use crate::chain::Link;
use crate::error::QueryBuilderError;
use crate::messages::MessageTable;
use crate::value::Value;

const ORDER_MESSAGES: MessageTable = &[
    (
        "direction",
        "Invalid sort direction \"<direction>\" specified for query builder \"<method>\" component.  Valid directions are \"ASC\" and \"DESC\".",
    ),
    (
        "string",
        "Invalid order string \"<arg>\" specified for query builder \"<method>\" component: a direction must follow a column.",
    ),
];

fn text<'a>(link: &Link<'_>, arg: &'a Arg) -> Result<&'a str, QueryBuilderError> {
    arg.as_str().ok_or_else(|| link.fail_arg(arg))
}

fn direction(token: &str) -> Option<&'static str> {
    if token.eq_ignore_ascii_case("asc") {
        Some("ASC")
    } else if token.eq_ignore_ascii_case("desc") {
        Some("DESC")
    } else {
        None
    }
}

fn checked_direction(link: &Link<'_>, token: &str) -> Result<&'static str, QueryBuilderError> {
    direction(token).ok_or_else(|| link.fail("direction", &[("direction", token)]))
}

fn push_columns(link: &mut Link<'_>, table: Option<&str>, names: &str, suffix: Option<&str>) {
    for name in split_names(names) {
        let mut sql = link.quote_table_column(table, name);
        if let Some(suffix) = suffix {
            sql.push(' ');
            sql.push_str(suffix);
        }
        link.push(sql);
    }
}

/// `GROUP BY` column list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Group;

impl Clause for Group {
    fn method(&self) -> &'static str {
        "group"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["group_by", "groupBy"]
    }

    fn slot(&self) -> Option<&'static str> {
        Some("group")
    }

    fn build_order(&self) -> Option<u32> {
        Some(60)
    }

    fn keyword(&self) -> &'static str {
        "GROUP BY"
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        push_columns(link, None, s, None);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        for item in items {
            let names = text(link, item)?;
            push_columns(link, None, names, None);
        }
        Ok(())
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        if !only_keys(pairs, &["column", "columns", "table"]) {
            return Err(link.fail_object(pairs));
        }
        let Some(names) = field(pairs, "column").or_else(|| field(pairs, "columns")) else {
            return Err(link.fail_object(pairs));
        };
        let names = text(link, names)?;
        let table = field(pairs, "table").map(|t| text(link, t)).transpose()?;
        push_columns(link, table, names, None);
        Ok(())
    }
}

/// `ORDER BY` with optional `ASC` / `DESC`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Order;

impl Clause for Order {
    fn method(&self) -> &'static str {
        "order"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["order_by", "orderBy"]
    }

    fn slot(&self) -> Option<&'static str> {
        Some("order")
    }

    fn build_order(&self) -> Option<u32> {
        Some(80)
    }

    fn keyword(&self) -> &'static str {
        "ORDER BY"
    }

    fn messages(&self) -> MessageTable {
        ORDER_MESSAGES
    }

    /// `"name DESC, id"`: a direction token applies to the column before it.
    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        let mut terms: Vec<String> = Vec::new();
        for token in split_names(s) {
            match (direction(token), terms.last_mut()) {
                (Some(dir), Some(last)) => {
                    last.push(' ');
                    last.push_str(dir);
                }
                (Some(_), None) => return Err(link.fail("string", &[("arg", s)])),
                (None, _) => terms.push(link.quote_path(token)),
            }
        }
        for term in terms {
            link.push(term);
        }
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        let [names, dir] = items else {
            return Err(link.fail_list(items));
        };
        let names = text(link, names)?;
        let dir = checked_direction(link, text(link, dir)?)?;
        push_columns(link, None, names, Some(dir));
        Ok(())
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        if !only_keys(pairs, &["column", "columns", "table", "direction", "desc"]) {
            return Err(link.fail_object(pairs));
        }
        let Some(names) = field(pairs, "column").or_else(|| field(pairs, "columns")) else {
            return Err(link.fail_object(pairs));
        };
        let names = text(link, names)?;
        let table = field(pairs, "table").map(|t| text(link, t)).transpose()?;
        let dir = match (field(pairs, "direction"), field(pairs, "desc")) {
            (Some(dir), _) => Some(checked_direction(link, text(link, dir)?)?),
            (None, Some(Arg::Value(Value::Bool(true)))) => Some("DESC"),
            (None, Some(Arg::Value(Value::Bool(false)))) => Some("ASC"),
            (None, Some(other)) => return Err(link.fail_arg(other)),
            (None, None) => None,
        };
        push_columns(link, table, names, dir);
        Ok(())
    }
}
