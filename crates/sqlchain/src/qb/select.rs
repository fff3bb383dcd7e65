use super::{Query, SqlQuery};
use crate::arg::Arg;

stage! {
    /// A SELECT statement in progress.
    SelectQuery
}

impl SelectQuery {
    clause_methods! {
        /// More `SELECT` columns.
        select("select") -> SelectQuery;
        /// Columns of the current table, honouring `prefix`.
        columns("columns") -> SelectQuery;
        from("from") -> SelectQuery;
        table("table") -> SelectQuery;
        prefix("prefix") -> SelectQuery;
        join("join") -> SelectQuery;
        /// `WHERE` predicates, joined with `AND`.
        where_("where") -> SelectQuery;
        having("having") -> SelectQuery;
        group("group") -> SelectQuery;
        /// Alias for [`group`](Self::group).
        group_by("group") -> SelectQuery;
        order("order") -> SelectQuery;
        /// Alias for [`order`](Self::order).
        order_by("order") -> SelectQuery;
        limit("limit") -> SelectQuery;
        offset("offset") -> SelectQuery;
        /// Inclusive row range, e.g. `range((10, 19))`.
        range("range") -> SelectQuery;
        with("with") -> SelectQuery;
    }
}
