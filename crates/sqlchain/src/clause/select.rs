//! Column lists: `SELECT`, `columns` and `RETURNING`.

use super::{Clause, field, only_keys, split_names};
use crate::arg::Arg;
use crate::chain::Link;
use crate::error::QueryBuilderError;

const COLUMN_KEYS: &[&str] = &["column", "columns", "as", "table", "prefix"];

/// Table and alias prefix applied to unqualified columns.
#[derive(Default)]
struct Scope {
    table: Option<String>,
    prefix: Option<String>,
}

impl Scope {
    /// `columns` picks up the context's table and prefix; the others do not.
    fn of(link: &Link<'_>, contextual: bool) -> Self {
        if !contextual {
            return Self::default();
        }
        let ctx = link.context();
        Self {
            table: ctx.table().map(str::to_string),
            prefix: ctx.prefix().map(str::to_string),
        }
    }
}

fn column(
    link: &Link<'_>,
    table: Option<&str>,
    name: &str,
    alias: Option<&str>,
    prefix: Option<&str>,
) -> String {
    let mut sql = link.quote_table_column(table, name);
    let bare = name.rsplit('.').next().unwrap_or(name);
    let alias = match (alias, prefix) {
        (Some(alias), _) => Some(alias.to_string()),
        (None, Some(prefix)) if bare != "*" => Some(format!("{prefix}{bare}")),
        _ => None,
    };
    if let Some(alias) = alias {
        sql.push_str(" AS ");
        sql.push_str(&link.quote(&alias));
    }
    sql
}

fn text<'a>(link: &Link<'_>, arg: &'a Arg) -> Result<&'a str, QueryBuilderError> {
    arg.as_str().ok_or_else(|| link.fail_arg(arg))
}

fn names(link: &mut Link<'_>, s: &str, contextual: bool) {
    let scope = Scope::of(link, contextual);
    for name in split_names(s) {
        let sql = column(
            link,
            scope.table.as_deref(),
            name,
            None,
            scope.prefix.as_deref(),
        );
        link.push(sql);
    }
}

fn list(link: &mut Link<'_>, items: &[Arg], contextual: bool) -> Result<(), QueryBuilderError> {
    let scope = Scope::of(link, contextual);
    let sql = match items {
        [name, alias] => column(
            link,
            scope.table.as_deref(),
            text(link, name)?,
            Some(text(link, alias)?),
            None,
        ),
        [table, name, alias] => column(
            link,
            Some(text(link, table)?),
            text(link, name)?,
            Some(text(link, alias)?),
            None,
        ),
        _ => return Err(link.fail_list(items)),
    };
    link.push(sql);
    Ok(())
}

fn object(
    link: &mut Link<'_>,
    pairs: &[(String, Arg)],
    contextual: bool,
) -> Result<(), QueryBuilderError> {
    if !only_keys(pairs, COLUMN_KEYS) {
        return Err(link.fail_object(pairs));
    }
    let Some(names) = field(pairs, "column").or_else(|| field(pairs, "columns")) else {
        return Err(link.fail_object(pairs));
    };
    let names = text(link, names)?;
    let alias = field(pairs, "as").map(|a| text(link, a)).transpose()?;
    let mut scope = Scope::of(link, contextual);
    if let Some(table) = field(pairs, "table") {
        scope.table = Some(text(link, table)?.to_string());
    }
    if let Some(prefix) = field(pairs, "prefix") {
        scope.prefix = Some(text(link, prefix)?.to_string());
    }

    let names: Vec<&str> = split_names(names).collect();
    if alias.is_some() && names.len() != 1 {
        return Err(link.fail_object(pairs));
    }
    for name in names {
        let sql = column(
            link,
            scope.table.as_deref(),
            name,
            alias,
            scope.prefix.as_deref(),
        );
        link.push(sql);
    }
    Ok(())
}

/// `SELECT` column list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Select;

impl Clause for Select {
    fn method(&self) -> &'static str {
        "select"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("select")
    }

    fn build_order(&self) -> Option<u32> {
        Some(20)
    }

    fn keyword(&self) -> &'static str {
        "SELECT"
    }

    fn query_kind(&self) -> Option<super::QueryKind> {
        Some(super::QueryKind::Select)
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        names(link, s, false);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        list(link, items, false)
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        object(link, pairs, false)
    }
}

/// Columns of the current table, written into the `SELECT` slot.
///
/// Unqualified names pick up the table set by `from` or `table`, and the
/// alias prefix set by `prefix`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Columns;

impl Clause for Columns {
    fn method(&self) -> &'static str {
        "columns"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("select")
    }

    fn query_kind(&self) -> Option<super::QueryKind> {
        Some(super::QueryKind::Select)
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        names(link, s, true);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        list(link, items, true)
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        object(link, pairs, true)
    }
}

/// `RETURNING`, for dialects that support it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Returning;

impl Clause for Returning {
    fn method(&self) -> &'static str {
        "returning"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("returning")
    }

    fn build_order(&self) -> Option<u32> {
        Some(96)
    }

    fn keyword(&self) -> &'static str {
        "RETURNING"
    }

    fn resolve_args(&self, link: &mut Link<'_>, args: &[Arg]) -> Result<(), QueryBuilderError> {
        if !link.dialect().returning() {
            return Err(QueryBuilderError::Unsupported(format!(
                "The {} dialect does not support RETURNING",
                link.dialect().name()
            )));
        }
        for arg in args {
            self.resolve_arg(link, arg)?;
        }
        Ok(())
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        names(link, s, false);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        list(link, items, false)
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        object(link, pairs, false)
    }
}
