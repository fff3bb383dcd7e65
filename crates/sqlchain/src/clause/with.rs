//! Common table expressions.

use super::{Clause, field, only_keys};
use crate::arg::{Arg, RawSql};
use crate::chain::Link;
use crate::error::QueryBuilderError;

/// `WITH "name" AS (...)`.
///
/// The body is raw SQL: `with(("recent", raw("SELECT ...")))` or
/// `with(json!({"name": "recent", "query": ...}))` with a raw `query`.
#[derive(Debug, Clone, Copy, Default)]
pub struct With;

fn expression(link: &mut Link<'_>, name: &Arg, body: &Arg) -> Result<(), QueryBuilderError> {
    let Some(name) = name.as_str() else {
        return Err(link.fail_arg(name));
    };
    let Arg::Raw(RawSql(body)) = body else {
        return Err(link.fail_arg(body));
    };
    let sql = format!("{} AS ({body})", link.quote(name));
    link.push(sql);
    Ok(())
}

impl Clause for With {
    fn method(&self) -> &'static str {
        "with"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("with")
    }

    fn build_order(&self) -> Option<u32> {
        Some(10)
    }

    fn keyword(&self) -> &'static str {
        "WITH"
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        match items {
            [name, body] => expression(link, name, body),
            _ => Err(link.fail_list(items)),
        }
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        if !only_keys(pairs, &["name", "query"]) {
            return Err(link.fail_object(pairs));
        }
        match (field(pairs, "name"), field(pairs, "query")) {
            (Some(name), Some(body)) => expression(link, name, body),
            _ => Err(link.fail_object(pairs)),
        }
    }
}
