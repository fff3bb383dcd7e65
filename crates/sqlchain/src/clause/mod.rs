//! SQL clause builders.
//!
//! A [`Clause`] is the behaviour behind one chain method: which context slot
//! it writes to, where that slot lands in the rendered statement, and how
//! each argument shape is parsed into fragments.
//!
//! Argument dispatch lives in [`Clause::resolve_arg`]. Clauses override only
//! the shape handlers they understand; the rest fail with
//! [`QueryBuilderError::NotImplemented`] so an incomplete custom clause is
//! loud rather than silently dropping arguments.
//!
//! # Writing a custom clause
//!
//! ```ignore
//! #[derive(Debug)]
//! struct Window;
//!
//! impl Clause for Window {
//!     fn method(&self) -> &'static str { "window" }
//!     fn slot(&self) -> Option<&'static str> { Some("window") }
//!     fn build_order(&self) -> Option<u32> { Some(75) }
//!     fn keyword(&self) -> &'static str { "WINDOW" }
//!     fn valid_for(&self) -> &'static [QueryKind] { &[QueryKind::Select] }
//!
//!     fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
//!         link.push(link.quote(s));
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::standard();
//! registry.register(Window);
//! ```

mod database;
mod delete;
mod from;
mod insert;
mod join;
mod limit;
mod order;
mod predicate;
mod select;
mod with;

pub use database::Database;
pub use delete::Delete;
pub use from::{FromClause, Prefix, Table, Update};
pub use insert::{Insert, IntoClause, Values};
pub use join::Join;
pub use limit::{Limit, Offset, Range};
pub use order::{Group, Order};
pub use predicate::{Having, Set, Where};
pub use select::{Columns, Returning, Select};
pub use with::With;

use crate::arg::{Arg, RawSql};
use crate::chain::Link;
use crate::context::Context;
use crate::error::QueryBuilderError;
use crate::fragment::Fragment;
use crate::messages::MessageTable;
use crate::value::Value;
use std::fmt;

/// The statement a chain builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl QueryKind {
    /// Upper-case keyword, as used in messages.
    pub fn name(self) -> &'static str {
        match self {
            QueryKind::Select => "SELECT",
            QueryKind::Insert => "INSERT",
            QueryKind::Update => "UPDATE",
            QueryKind::Delete => "DELETE",
        }
    }

    /// Indefinite article for [`name`](Self::name).
    pub fn article(self) -> &'static str {
        match self {
            QueryKind::Insert | QueryKind::Update => "an",
            QueryKind::Select | QueryKind::Delete => "a",
        }
    }

    /// Methods a chain of this kind may continue with.
    pub fn allowed_methods(self) -> &'static [&'static str] {
        match self {
            QueryKind::Select => &[
                "select", "columns", "from", "table", "prefix", "join", "where", "having", "group",
                "order", "limit", "offset", "range", "with",
            ],
            QueryKind::Insert => &["insert", "into", "values", "returning", "table", "with"],
            QueryKind::Update => &[
                "update", "set", "where", "join", "from", "returning", "table", "with",
            ],
            QueryKind::Delete => &[
                "delete", "from", "where", "join", "returning", "table", "with",
            ],
        }
    }

    pub fn allows(self, method: &str) -> bool {
        self.allowed_methods().contains(&method)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour behind one chain method.
pub trait Clause: fmt::Debug + Send + Sync + 'static {
    /// Chain method name.
    fn method(&self) -> &'static str;

    /// Extra method names resolving to this clause.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Context slot the clause writes to. `None` for clauses that only touch
    /// sideways state.
    fn slot(&self) -> Option<&'static str> {
        None
    }

    /// Serialization rank of the slot. Clauses sharing a slot leave this to
    /// the one that renders it.
    fn build_order(&self) -> Option<u32> {
        None
    }

    fn keyword(&self) -> &'static str {
        ""
    }

    /// Separator between fragments.
    fn joint(&self) -> &'static str {
        ", "
    }

    /// Whether the slot is marked present even with no fragments, so the
    /// keyword renders on its own.
    fn always_render(&self) -> bool {
        false
    }

    /// Whether a new call replaces the slot rather than appending to it.
    fn replaces_slot(&self) -> bool {
        false
    }

    /// The kind of statement this clause starts, if any.
    fn query_kind(&self) -> Option<QueryKind> {
        None
    }

    /// Query kinds this clause may follow even though the kind's own method
    /// list does not name it.
    fn valid_for(&self) -> &'static [QueryKind] {
        &[]
    }

    /// Clause-specific message templates, consulted before the shared ones.
    fn messages(&self) -> MessageTable {
        &[]
    }

    /// Resolve every argument of one call.
    fn resolve_args(&self, link: &mut Link<'_>, args: &[Arg]) -> Result<(), QueryBuilderError> {
        for arg in args {
            self.resolve_arg(link, arg)?;
        }
        Ok(())
    }

    /// Dispatch one argument by shape.
    fn resolve_arg(&self, link: &mut Link<'_>, arg: &Arg) -> Result<(), QueryBuilderError> {
        match arg {
            Arg::Null => Ok(()),
            Arg::Text(s) => self.resolve_string(link, s),
            Arg::List(items) => self.resolve_list(link, items),
            Arg::Object(pairs) => self.resolve_object(link, pairs),
            Arg::Value(v) => self.resolve_value(link, v),
            Arg::Raw(sql) => self.resolve_raw(link, sql),
            Arg::Func(f) => f(link),
        }
    }

    fn resolve_string(&self, _link: &mut Link<'_>, _s: &str) -> Result<(), QueryBuilderError> {
        Err(QueryBuilderError::NotImplemented {
            method: self.method(),
            handler: "resolve_string",
        })
    }

    fn resolve_list(&self, _link: &mut Link<'_>, _items: &[Arg]) -> Result<(), QueryBuilderError> {
        Err(QueryBuilderError::NotImplemented {
            method: self.method(),
            handler: "resolve_list",
        })
    }

    fn resolve_object(
        &self,
        _link: &mut Link<'_>,
        _pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        Err(QueryBuilderError::NotImplemented {
            method: self.method(),
            handler: "resolve_object",
        })
    }

    fn resolve_value(&self, _link: &mut Link<'_>, _v: &Value) -> Result<(), QueryBuilderError> {
        Err(QueryBuilderError::NotImplemented {
            method: self.method(),
            handler: "resolve_value",
        })
    }

    /// Raw SQL goes in verbatim.
    fn resolve_raw(&self, link: &mut Link<'_>, sql: &RawSql) -> Result<(), QueryBuilderError> {
        link.push(sql.as_str());
        Ok(())
    }

    /// Render the slot: keyword, then fragments joined by [`joint`](Self::joint).
    fn generate_sql(&self, fragments: &[Fragment], _context: &Context) -> Fragment {
        let body = Fragment::join(fragments, self.joint());
        let keyword = self.keyword();
        if body.is_empty() {
            return if self.always_render() {
                Fragment::new(keyword)
            } else {
                Fragment::empty()
            };
        }
        if keyword.is_empty() {
            return body;
        }
        let mut out = Fragment::new(keyword);
        out.push(" ").push_fragment(&body);
        out
    }
}

/// Split a name list on whitespace and commas.
pub(crate) fn split_names(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
}

/// Look up `key` in an object argument.
pub(crate) fn field<'a>(pairs: &'a [(String, Arg)], key: &str) -> Option<&'a Arg> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// True when every key in `pairs` is one of `allowed`.
pub(crate) fn only_keys(pairs: &[(String, Arg)], allowed: &[&str]) -> bool {
    pairs.iter().all(|(k, _)| allowed.contains(&k.as_str()))
}

#[cfg(test)]
mod tests;
