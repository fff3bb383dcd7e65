use super::{Query, SqlQuery};
use crate::arg::Arg;

stage! {
    /// An UPDATE statement in progress.
    UpdateQuery
}

impl UpdateQuery {
    clause_methods! {
        /// `SET` assignments. Bound before any `WHERE` values.
        set("set") -> UpdateQuery;
        where_("where") -> UpdateQuery;
        join("join") -> UpdateQuery;
        from("from") -> UpdateQuery;
        returning("returning") -> UpdateQuery;
        table("table") -> UpdateQuery;
        with("with") -> UpdateQuery;
    }
}
