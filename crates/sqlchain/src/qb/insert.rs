use super::{Query, SqlQuery};
use crate::arg::Arg;

stage! {
    /// An INSERT statement in progress.
    InsertQuery
}

impl InsertQuery {
    clause_methods! {
        /// More column names.
        insert("insert") -> InsertQuery;
        /// Target table; reserves one placeholder per column.
        into("into") -> InsertQuery;
        /// Values for the reserved placeholders, in column order.
        values("values") -> InsertQuery;
        returning("returning") -> InsertQuery;
        table("table") -> InsertQuery;
        with("with") -> InsertQuery;
    }
}
