//! Query builder stages.
//!
//! Every fluent call appends one node to an immutable chain. The stage
//! types only expose the methods that are legal for the statement being
//! built, so `select` after `update` does not compile. Custom clauses go
//! through [`Query::call`] (checked at run time) or the stages' `call`.
//!
//! # Usage
//!
//! ```ignore
//! use sqlchain::prelude::*;
//!
//! // SELECT
//! let q = qb::sqlite()
//!     .from("users")
//!     .select("id email")
//!     .where_(("name", "Bobby Badger"));
//! assert_eq!(q.sql()?, "SELECT \"id\", \"email\"\nFROM \"users\"\nWHERE \"name\" = ?");
//!
//! // INSERT
//! let q = qb::postgres()
//!     .insert("name email")
//!     .into("users")
//!     .values(("Bobby", "bobby@example.com"))
//!     .returning("id");
//!
//! // UPDATE
//! qb::postgres()
//!     .update("users")
//!     .set(("status", "inactive"))
//!     .where_(("id", user_id))
//!     .execute(&client, &[])
//!     .await?;
//!
//! // DELETE
//! qb::postgres().delete().from("users").where_(("id", user_id));
//! ```

/// Stage methods that append one clause node and move to `$stage`.
macro_rules! clause_methods {
    ($( $(#[$doc:meta])* $name:ident($method:literal) -> $stage:ident; )*) => {
        $(
            $(#[$doc])*
            pub fn $name(self, arg: impl Into<Arg>) -> $stage {
                $stage::from_query(self.into_query().chain($method, vec![arg.into()]))
            }
        )*
    };
}

/// Shared plumbing for a stage wrapping a [`Query`].
macro_rules! stage {
    ($(#[$doc:meta])* $stage:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        #[must_use]
        pub struct $stage {
            inner: Query,
        }

        impl $stage {
            pub(crate) fn from_query(inner: Query) -> Self {
                Self { inner }
            }

            /// The untyped chain.
            pub fn into_query(self) -> Query {
                self.inner
            }

            /// Call any registered method, including custom clauses.
            ///
            /// Errors are kept and surface from the terminal call.
            pub fn call(self, method: &str, args: impl IntoIterator<Item = Arg>) -> Self {
                Self::from_query(self.inner.chain(method, args.into_iter().collect()))
            }
        }

        impl SqlQuery for $stage {
            fn query(&self) -> &Query {
                &self.inner
            }
        }
    };
}

mod builder;
mod delete;
mod insert;
mod query;
mod select;
mod traits;
mod update;

pub use builder::QueryBuilder;
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use query::Query;
pub use select::SelectQuery;
pub use traits::{Built, DEFAULT_SQL_LOG_LENGTH, SqlQuery};
pub use update::UpdateQuery;

use crate::dialect::{Dialect, Mysql, Postgres, Sqlite};

/// Start a chain for `dialect` on the standard registry.
pub fn builder(dialect: impl Dialect + 'static) -> QueryBuilder {
    QueryBuilder::new(dialect)
}

/// Start a PostgreSQL chain (`$n` placeholders).
pub fn postgres() -> QueryBuilder {
    QueryBuilder::new(Postgres)
}

/// Start a SQLite chain (`?` placeholders).
pub fn sqlite() -> QueryBuilder {
    QueryBuilder::new(Sqlite)
}

/// Start a MySQL chain (`?` placeholders, backtick quoting).
pub fn mysql() -> QueryBuilder {
    QueryBuilder::new(Mysql)
}
