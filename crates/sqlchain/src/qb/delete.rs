use super::{Query, SqlQuery};
use crate::arg::Arg;

stage! {
    /// A DELETE statement in progress.
    DeleteQuery
}

impl DeleteQuery {
    clause_methods! {
        from("from") -> DeleteQuery;
        where_("where") -> DeleteQuery;
        join("join") -> DeleteQuery;
        returning("returning") -> DeleteQuery;
        table("table") -> DeleteQuery;
        with("with") -> DeleteQuery;
    }
}
