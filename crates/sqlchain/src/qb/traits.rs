//! Terminal operations shared by every stage.

use crate::chain;
use crate::clause::QueryKind;
use crate::context::Context;
use crate::error::{Error, QueryBuilderError, Result};
use crate::executor::{Executor, truncate_sql};
use crate::qb::query::Query;
use crate::value::{Row, Value};
use std::sync::Arc;
use tracing::debug;

/// Longest SQL string written to `sqlchain.sql` debug events.
pub const DEFAULT_SQL_LOG_LENGTH: usize = 200;

/// Rendering and execution for anything wrapping a [`Query`].
///
/// Rendering is idempotent: the chain's contexts are memoized, so calling
/// [`sql`](SqlQuery::sql) twice neither re-parses arguments nor advances
/// the placeholder count.
pub trait SqlQuery: Sync {
    /// The underlying chain.
    fn query(&self) -> &Query;

    /// The fully resolved context.
    fn context(&self) -> std::result::Result<Arc<Context>, QueryBuilderError> {
        self.query().resolve()
    }

    /// Render the SQL string.
    fn sql(&self) -> std::result::Result<String, QueryBuilderError> {
        let query = self.query();
        let ctx = query.resolve()?;
        Ok(chain::render(&ctx, query.registry(), query.dialect()))
    }

    /// Bind values known at build time.
    ///
    /// Fails with [`QueryBuilderError::MissingValues`] if some placeholders
    /// are still deferred; use [`all_values`](SqlQuery::all_values) then.
    fn values(&self) -> std::result::Result<Vec<Value>, QueryBuilderError> {
        self.all_values(&[])
    }

    /// `set ++ where ++ having ++ extra`, filling deferred placeholders from
    /// the front of `extra`.
    fn all_values(&self, extra: &[Value]) -> std::result::Result<Vec<Value>, QueryBuilderError> {
        self.context()?.all_values(extra)
    }

    /// Bind values computed entirely by `f` from the resolved context.
    fn all_values_with<F>(&self, f: F) -> std::result::Result<Vec<Value>, QueryBuilderError>
    where
        F: FnOnce(&Context) -> Vec<Value>,
    {
        let ctx = self.context()?;
        Ok(f(&ctx))
    }

    /// SQL and values ready to execute.
    fn build(&self, extra: &[Value]) -> std::result::Result<Built, QueryBuilderError> {
        let query = self.query();
        let ctx = query.resolve()?;
        let sql = chain::render(&ctx, query.registry(), query.dialect());
        let values = ctx.all_values(extra)?;
        if values.len() != ctx.placeholders() {
            return Err(QueryBuilderError::BindMismatch {
                placeholders: ctx.placeholders(),
                values: values.len(),
            });
        }
        Ok(Built {
            sql,
            values,
            kind: query.kind(),
            generated_keys: ctx.generated_keys(),
            returning: ctx.has_slot("returning"),
        })
    }

    /// Execute and return all rows.
    fn fetch_all(
        &self,
        exec: &impl Executor,
        extra: &[Value],
    ) -> impl std::future::Future<Output = Result<Vec<Row>>> + Send {
        async move {
            let built = self.build(extra)?;
            built.fetch_all(exec).await
        }
    }

    /// Execute and return the first row, or [`Error::NotFound`].
    fn fetch_one(
        &self,
        exec: &impl Executor,
        extra: &[Value],
    ) -> impl std::future::Future<Output = Result<Row>> + Send {
        async move {
            let built = self.build(extra)?;
            built.fetch_one(exec).await
        }
    }

    /// Execute and return the first row, if any.
    fn fetch_opt(
        &self,
        exec: &impl Executor,
        extra: &[Value],
    ) -> impl std::future::Future<Output = Result<Option<Row>>> + Send {
        async move {
            let built = self.build(extra)?;
            built.fetch_opt(exec).await
        }
    }

    /// Execute an `INSERT` and return the rows it generated.
    ///
    /// See [`Built::fetch_generated_keys`].
    fn fetch_generated_keys(
        &self,
        exec: &impl Executor,
        extra: &[Value],
    ) -> impl std::future::Future<Output = Result<Vec<Row>>> + Send {
        async move {
            let built = self.build(extra)?;
            built.fetch_generated_keys(exec).await
        }
    }

    /// Execute and return the affected row count.
    fn execute(
        &self,
        exec: &impl Executor,
        extra: &[Value],
    ) -> impl std::future::Future<Output = Result<u64>> + Send {
        async move {
            let built = self.build(extra)?;
            built.execute(exec).await
        }
    }
}

/// A rendered statement with its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub sql: String,
    pub values: Vec<Value>,
    pub kind: Option<QueryKind>,
    /// Whether the statement asks for generated keys.
    pub generated_keys: bool,
    /// Whether the statement has its own `RETURNING` list.
    pub returning: bool,
}

impl Built {
    fn log(&self, sql: &str) {
        debug!(
            target: "sqlchain.sql",
            kind = ?self.kind,
            param_count = self.values.len(),
            sql = %truncate_sql(sql, DEFAULT_SQL_LOG_LENGTH),
            "executing"
        );
    }

    pub async fn fetch_all(&self, exec: &impl Executor) -> Result<Vec<Row>> {
        self.log(&self.sql);
        exec.fetch(&self.sql, &self.values).await
    }

    pub async fn fetch_one(&self, exec: &impl Executor) -> Result<Row> {
        self.fetch_opt(exec)
            .await?
            .ok_or_else(|| Error::not_found("query returned no rows"))
    }

    pub async fn fetch_opt(&self, exec: &impl Executor) -> Result<Option<Row>> {
        Ok(self.fetch_all(exec).await?.into_iter().next())
    }

    pub async fn execute(&self, exec: &impl Executor) -> Result<u64> {
        self.log(&self.sql);
        exec.execute(&self.sql, &self.values).await
    }

    /// Run an `INSERT` and return the rows it generated.
    ///
    /// A statement with its own `RETURNING` list runs as written. Otherwise
    /// `RETURNING *` is appended when the dialect hands back generated keys;
    /// without that support this fails with
    /// [`QueryBuilderError::Unsupported`].
    pub async fn fetch_generated_keys(&self, exec: &impl Executor) -> Result<Vec<Row>> {
        if self.returning {
            return self.fetch_all(exec).await;
        }
        if !self.generated_keys {
            return Err(QueryBuilderError::Unsupported(
                "This statement cannot return generated keys".to_string(),
            )
            .into());
        }
        let sql = format!("{}\nRETURNING *", self.sql);
        self.log(&sql);
        exec.fetch(&sql, &self.values).await
    }
}
