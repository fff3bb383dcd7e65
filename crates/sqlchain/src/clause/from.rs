//! Table-naming clauses: `FROM`, `UPDATE`, `table` and `prefix`.
//!
//! Each records the last table name (or its alias) in the context so later
//! column calls without an explicit table default to it.

use super::{Clause, QueryKind, field, only_keys, split_names};
use crate::arg::Arg;
use crate::chain::Link;
use crate::error::QueryBuilderError;

fn text<'a>(link: &Link<'_>, arg: &'a Arg) -> Result<&'a str, QueryBuilderError> {
    arg.as_str().ok_or_else(|| link.fail_arg(arg))
}

/// `"table"` or `"table" AS "alias"`, recording the visible name.
fn table(link: &mut Link<'_>, name: &str, alias: Option<&str>) {
    let mut sql = link.quote_path(name);
    if let Some(alias) = alias {
        sql.push_str(" AS ");
        sql.push_str(&link.quote(alias));
    }
    link.push(sql);
    link.context_mut().set_table(alias.unwrap_or(name));
}

/// `FROM` table list.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromClause;

impl Clause for FromClause {
    fn method(&self) -> &'static str {
        "from"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("from")
    }

    fn build_order(&self) -> Option<u32> {
        Some(30)
    }

    fn keyword(&self) -> &'static str {
        "FROM"
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        for name in split_names(s) {
            table(link, name, None);
        }
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        let [name, alias] = items else {
            return Err(link.fail_list(items));
        };
        let (name, alias) = (text(link, name)?, text(link, alias)?);
        table(link, name, Some(alias));
        Ok(())
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        if !only_keys(pairs, &["table", "as"]) {
            return Err(link.fail_object(pairs));
        }
        let Some(name) = field(pairs, "table") else {
            return Err(link.fail_object(pairs));
        };
        let name = text(link, name)?;
        let alias = field(pairs, "as").map(|a| text(link, a)).transpose()?;
        table(link, name, alias);
        Ok(())
    }
}

/// `UPDATE "table"`. Starts an UPDATE query.
#[derive(Debug, Clone, Copy, Default)]
pub struct Update;

impl Clause for Update {
    fn method(&self) -> &'static str {
        "update"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("update")
    }

    fn build_order(&self) -> Option<u32> {
        Some(15)
    }

    fn keyword(&self) -> &'static str {
        "UPDATE"
    }

    fn query_kind(&self) -> Option<QueryKind> {
        Some(QueryKind::Update)
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        table(link, s.trim(), None);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        let [name, alias] = items else {
            return Err(link.fail_list(items));
        };
        let (name, alias) = (text(link, name)?, text(link, alias)?);
        table(link, name, Some(alias));
        Ok(())
    }
}

/// Sets the default table without rendering anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Table;

impl Clause for Table {
    fn method(&self) -> &'static str {
        "table"
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        link.context_mut().set_table(s.trim());
        Ok(())
    }
}

/// Sets the alias prefix `columns` applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prefix;

impl Clause for Prefix {
    fn method(&self) -> &'static str {
        "prefix"
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        link.context_mut().set_prefix(s);
        Ok(())
    }
}
