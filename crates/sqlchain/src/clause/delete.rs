use super::{Clause, QueryKind, split_names};
use crate::chain::Link;
use crate::error::QueryBuilderError;

/// `DELETE`, optionally naming the tables to delete from.
///
/// With no arguments the slot is still marked present, so the statement
/// renders as a bare `DELETE` ahead of its `FROM`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Delete;

impl Clause for Delete {
    fn method(&self) -> &'static str {
        "delete"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("delete")
    }

    fn build_order(&self) -> Option<u32> {
        Some(19)
    }

    fn keyword(&self) -> &'static str {
        "DELETE"
    }

    fn always_render(&self) -> bool {
        true
    }

    fn query_kind(&self) -> Option<QueryKind> {
        Some(QueryKind::Delete)
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        for name in split_names(s) {
            let sql = link.quote_path(name);
            link.push(sql);
        }
        Ok(())
    }
}
