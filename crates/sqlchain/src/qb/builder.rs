use super::{DeleteQuery, InsertQuery, Query, SelectQuery, SqlQuery, UpdateQuery};
use crate::arg::Arg;
use crate::dialect::Dialect;
use crate::registry::Registry;
use std::sync::Arc;

stage! {
    /// The root of a chain. No statement kind yet, so every method is open.
    QueryBuilder
}

impl QueryBuilder {
    /// A root on the shared standard registry.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::from_query(Query::new(dialect))
    }

    /// A root on a custom registry.
    pub fn with_registry(registry: Arc<Registry>, dialect: impl Dialect + 'static) -> Self {
        Self::from_query(Query::with_registry(registry, dialect))
    }

    clause_methods! {
        /// Start a SELECT with a column list.
        select("select") -> SelectQuery;
        /// Start a SELECT with columns of the current table.
        columns("columns") -> SelectQuery;
        /// Start an INSERT with its column names.
        insert("insert") -> InsertQuery;
        /// Start an UPDATE of `table`.
        update("update") -> UpdateQuery;
        /// `FROM`, before the statement kind is known.
        from("from") -> QueryBuilder;
        /// Default table for later column calls.
        table("table") -> QueryBuilder;
        /// Alias prefix for later `columns` calls.
        prefix("prefix") -> QueryBuilder;
        /// Common table expression.
        with("with") -> QueryBuilder;
    }

    /// Start a bare `DELETE`.
    pub fn delete(self) -> DeleteQuery {
        DeleteQuery::from_query(self.into_query().chain("delete", Vec::new()))
    }

    /// Start `DELETE <tables>`, for multi-table deletes.
    pub fn delete_tables(self, tables: impl Into<Arg>) -> DeleteQuery {
        DeleteQuery::from_query(self.into_query().chain("delete", vec![tables.into()]))
    }
}
