//! # sqlchain
//!
//! A fluent, dialect-aware SQL query builder.
//!
//! ## Features
//!
//! - **Chains of immutable nodes**: every call appends a node; contexts are
//!   resolved lazily, memoized per node and never mutate a parent
//! - **Grammar by type**: each statement stage only exposes the methods that
//!   are legal for it, with a run-time checked path for custom clauses
//! - **Argument shapes**: strings, lists and objects all parse per clause
//!   (`"id email"`, `("age", ">", 21)`, `{"id": {"isIn": [1, 2]}}`)
//! - **Stable bind order**: parameters always come out as `SET`, then
//!   `WHERE`, then `HAVING`, whatever order the calls were made in
//! - **Pluggable dialects**: quoting, `?` vs `$n` placeholders and
//!   `RETURNING` support come from a [`Dialect`]
//! - **Custom clauses**: register your own [`Clause`] in a [`Registry`]
//!
//! ## Example
//!
//! ```ignore
//! use sqlchain::prelude::*;
//!
//! let q = qb::sqlite()
//!     .from("users")
//!     .select("id email")
//!     .where_(("name", "Bobby Badger"));
//!
//! assert_eq!(q.sql()?, "SELECT \"id\", \"email\"\nFROM \"users\"\nWHERE \"name\" = ?");
//! assert_eq!(q.values()?, vec![Value::from("Bobby Badger")]);
//!
//! // Run it through any `Executor`, e.g. a `tokio_postgres::Client`.
//! let rows = q.fetch_all(&client, &[]).await?;
//! ```

pub mod arg;
pub mod chain;
pub mod clause;
pub mod comparator;
pub mod context;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod fragment;
pub mod messages;
pub mod qb;
pub mod registry;
pub mod value;

#[cfg(feature = "postgres")]
pub mod postgres;

pub mod prelude;

pub use arg::{Arg, RawSql, raw};
pub use chain::{Link, Node};
pub use clause::{Clause, QueryKind};
pub use context::{Bind, BindTarget, Context};
pub use dialect::{Dialect, DialectConfig, GenericDialect, Mysql, PlaceholderStyle, Postgres, Sqlite};
pub use error::{Error, QueryBuilderError, Result};
pub use executor::{Executor, TracingExecutor};
pub use fragment::Fragment;
pub use qb::{
    Built, DeleteQuery, InsertQuery, Query, QueryBuilder, SelectQuery, SqlQuery, UpdateQuery,
};
pub use registry::Registry;
pub use value::{Row, Value};
