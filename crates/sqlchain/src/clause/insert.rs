//! `INSERT`, `INTO` and `values`.
//!
//! `insert` records the column names, `into` renders the table, column list
//! and one placeholder per column, and `values` fills those placeholders.
//! Values given before `into` are held until it runs. Placeholders still
//! empty when the query runs take the execution values.

use super::{Clause, QueryKind, split_names};
use crate::arg::Arg;
use crate::chain::Link;
use crate::context::BindTarget;
use crate::error::QueryBuilderError;
use crate::fragment::Fragment;
use crate::value::Value;

/// `INSERT`. Records columns; renders the bare keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct Insert;

impl Clause for Insert {
    fn method(&self) -> &'static str {
        "insert"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("insert")
    }

    fn build_order(&self) -> Option<u32> {
        Some(17)
    }

    fn keyword(&self) -> &'static str {
        "INSERT"
    }

    fn always_render(&self) -> bool {
        true
    }

    fn query_kind(&self) -> Option<QueryKind> {
        Some(QueryKind::Insert)
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        let columns: Vec<String> = split_names(s).map(str::to_string).collect();
        link.context_mut().add_columns(columns);
        Ok(())
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        for item in items {
            match item {
                Arg::Text(s) => self.resolve_string(link, s)?,
                other => return Err(link.fail_arg(other)),
            }
        }
        Ok(())
    }
}

/// `INTO "table" ("a", "b") VALUES (?, ?)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntoClause;

impl Clause for IntoClause {
    fn method(&self) -> &'static str {
        "into"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("into")
    }

    fn build_order(&self) -> Option<u32> {
        Some(25)
    }

    fn keyword(&self) -> &'static str {
        "INTO"
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        let table = s.trim();
        let mut fragment = Fragment::new(link.quote_path(table));
        let columns = link.context().columns().to_vec();
        if !columns.is_empty() {
            let names: Vec<String> = columns.iter().map(|c| link.quote(c)).collect();
            fragment
                .push(" (")
                .push(&names.join(", "))
                .push(") VALUES (")
                .push_params(columns.len(), ", ")
                .push(")");
        }
        link.push(fragment);

        let mut held = link.context_mut().take_held().into_iter();
        for _ in &columns {
            match held.next() {
                Some(value) => link.bind(BindTarget::Set, value),
                None => link.defer(BindTarget::Set),
            }
        }
        // Surplus values have no placeholder and fail the bind check.
        for value in held {
            link.bind(BindTarget::Set, value);
        }
        let returning = link.dialect().returning();
        let ctx = link.context_mut();
        ctx.set_table(table);
        ctx.set_generated_keys(returning);
        Ok(())
    }
}

/// Values for the `INTO` placeholders, in column order.
///
/// Fills the earliest empty placeholders first. Before `into` has run the
/// values are held and bound to its placeholders when it does. A list
/// argument supplies one value per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct Values;

impl Values {
    fn fill(&self, link: &mut Link<'_>, arg: &Arg) -> Result<(), QueryBuilderError> {
        let Some(value) = arg.to_value() else {
            return Err(link.fail_arg(arg));
        };
        Self::store(link, value);
        Ok(())
    }

    fn store(link: &mut Link<'_>, value: Value) {
        let ctx = link.context_mut();
        if ctx.has_slot("into") {
            ctx.fill(BindTarget::Set, value);
        } else {
            ctx.hold(value);
        }
    }
}

impl Clause for Values {
    fn method(&self) -> &'static str {
        "values"
    }

    fn resolve_arg(&self, link: &mut Link<'_>, arg: &Arg) -> Result<(), QueryBuilderError> {
        match arg {
            Arg::List(items) => {
                for item in items {
                    self.fill(link, item)?;
                }
                Ok(())
            }
            Arg::Object(_) | Arg::Raw(_) | Arg::Func(_) => Err(link.fail_arg(arg)),
            Arg::Null => {
                Self::store(link, Value::Null);
                Ok(())
            }
            scalar => self.fill(link, scalar),
        }
    }
}
