//! Convenient imports for typical `sqlchain` usage.
//!
//! ```ignore
//! use sqlchain::prelude::*;
//! ```

pub use crate::comparator::{eq, ge, gt, is_in, is_null, le, like, lt, ne, not_in, not_like, not_null};
pub use crate::qb;
pub use crate::{
    Arg, Clause, Dialect, Error, Executor, Link, Mysql, Postgres, Query, QueryBuilder,
    QueryBuilderError, QueryKind, Registry, Result, Row, Sqlite, SqlQuery, Value, raw,
};
