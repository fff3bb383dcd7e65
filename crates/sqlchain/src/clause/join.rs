//! `JOIN ... ON ...`.
//!
//! ```text
//! "users.id=orders.user_id"     JOIN "orders" ON "users"."id" = "orders"."user_id"
//! "users.id=>orders.user_id"    LEFT JOIN ...
//! "users.id<=orders.user_id"    RIGHT JOIN ...
//! "users.id<=>orders.user_id"   FULL JOIN ...
//! ```
//!
//! The `from` column is used as written; qualify it to name its table.

use super::{Clause, field, only_keys};
use crate::arg::Arg;
use crate::chain::Link;
use crate::error::QueryBuilderError;
use crate::messages::{self, MessageTable};

const JOIN_TYPES: &[(&str, &str)] = &[
    ("inner", "JOIN"),
    ("left", "LEFT JOIN"),
    ("right", "RIGHT JOIN"),
    ("full", "FULL JOIN"),
];

/// Checked longest first so `<=>` is not read as `<=`.
const JOIN_OPERATORS: &[(&str, &str)] = &[("<=>", "full"), ("=>", "left"), ("<=", "right"), ("=", "inner")];

const JOIN_MESSAGES: MessageTable = &[
    (
        "type",
        "Invalid join type \"<type>\" specified for query builder \"<method>\" component.  Valid types are <types>.",
    ),
    (
        "string",
        "Invalid join string \"<join>\" specified for query builder \"<method>\" component.  Valid formats are \"from=table.to\", \"from=>table.to\", \"from<=table.to\" and \"from<=>table.to\".",
    ),
    (
        "object",
        "Invalid object with \"<keys>\" properties specified for query builder \"<method>\" component.  Valid properties are \"type\", \"table\", \"from\" and \"to\".",
    ),
];

fn text<'a>(link: &Link<'_>, arg: &'a Arg) -> Result<&'a str, QueryBuilderError> {
    arg.as_str().ok_or_else(|| link.fail_arg(arg))
}

fn join_keyword(link: &Link<'_>, kind: &str) -> Result<&'static str, QueryBuilderError> {
    let lower = kind.trim().to_ascii_lowercase();
    let name = lower.strip_suffix(" join").unwrap_or(&lower).trim();
    JOIN_TYPES
        .iter()
        .find(|(t, _)| *t == name)
        .map(|(_, keyword)| *keyword)
        .ok_or_else(|| {
            let types: Vec<&str> = JOIN_TYPES.iter().map(|(t, _)| *t).collect();
            let types = messages::alternatives(&types);
            link.fail("type", &[("type", kind), ("types", types.as_str())])
        })
}

/// Split `table.column` at the last dot.
fn target<'a>(link: &Link<'_>, s: &'a str) -> Result<(&'a str, &'a str), QueryBuilderError> {
    match s.rsplit_once('.') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => Ok((table, column)),
        _ => Err(link.fail("string", &[("join", s)])),
    }
}

fn render(link: &mut Link<'_>, keyword: &str, from: &str, table: &str, to: &str) {
    let sql = format!(
        "{keyword} {} ON {} = {}",
        link.quote_path(table),
        link.quote_path(from),
        link.quote_table_column(Some(table), to),
    );
    link.push(sql);
}

/// Table joins. Each call adds one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Join;

impl Clause for Join {
    fn method(&self) -> &'static str {
        "join"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("join")
    }

    fn build_order(&self) -> Option<u32> {
        Some(40)
    }

    fn joint(&self) -> &'static str {
        "\n"
    }

    fn messages(&self) -> MessageTable {
        JOIN_MESSAGES
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        let Some((op, kind)) = JOIN_OPERATORS.iter().find(|(op, _)| s.contains(op)) else {
            return Err(link.fail("string", &[("join", s)]));
        };
        let Some((from, to)) = s.split_once(op) else {
            return Err(link.fail("string", &[("join", s)]));
        };
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() {
            return Err(link.fail("string", &[("join", s)]));
        }
        let (table, to) = target(link, to)?;
        let keyword = join_keyword(link, kind)?;
        render(link, keyword, from, table, to);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        let (kind, from, table, to) = match items {
            [from, to] => {
                let (table, to) = target(link, text(link, to)?)?;
                ("inner", text(link, from)?, table, to)
            }
            [kind, from, to] => {
                let (table, to) = target(link, text(link, to)?)?;
                (text(link, kind)?, text(link, from)?, table, to)
            }
            [kind, from, table, to] => (
                text(link, kind)?,
                text(link, from)?,
                text(link, table)?,
                text(link, to)?,
            ),
            _ => return Err(link.fail_list(items)),
        };
        let keyword = join_keyword(link, kind)?;
        render(link, keyword, from, table, to);
        Ok(())
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        if !only_keys(pairs, &["type", "table", "from", "to"]) {
            return Err(link.fail_object(pairs));
        }
        let (Some(from), Some(to)) = (field(pairs, "from"), field(pairs, "to")) else {
            return Err(link.fail_object(pairs));
        };
        let (from, to) = (text(link, from)?, text(link, to)?);
        let kind = match field(pairs, "type") {
            Some(kind) => text(link, kind)?,
            None => "inner",
        };
        let (table, to) = match field(pairs, "table") {
            Some(table) => (text(link, table)?, to),
            None => target(link, to)?,
        };
        let keyword = join_keyword(link, kind)?;
        render(link, keyword, from, table, to);
        Ok(())
    }
}
