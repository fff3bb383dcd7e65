//! The execution boundary.
//!
//! The builder only renders SQL and values. Running them is delegated to an
//! [`Executor`], so connection handling, transactions, cancellation and
//! timeouts all live on the other side of this trait.

use crate::error::Result;
use crate::value::{Row, Value};
use std::borrow::Cow;
use tracing::Level;

/// Something that can run rendered SQL.
pub trait Executor: Send + Sync {
    /// Run a query and return all rows.
    fn fetch(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = Result<Vec<Row>>> + Send;

    /// Run a statement and return the affected row count.
    fn execute(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}

/// Cut `sql` to at most `max` bytes on a char boundary, marking the cut.
pub fn truncate_sql(sql: &str, max: usize) -> Cow<'_, str> {
    if sql.len() <= max {
        return Cow::Borrowed(sql);
    }
    let mut end = max;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}...", &sql[..end]))
}

/// An [`Executor`] wrapper that emits every statement as a `tracing` event
/// on the `sqlchain.sql` target before running it.
#[derive(Debug, Clone)]
pub struct TracingExecutor<E> {
    inner: E,
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl<E: Executor> TracingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn emit(&self, op: &'static str, sql: &str, param_count: usize) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN => tracing::warn!($($field)*),
                    Level::INFO => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = match self.max_sql_length {
            Some(max) => truncate_sql(sql, max),
            None => Cow::Borrowed(sql),
        };
        emit_at_level!(
            self.level,
            target: "sqlchain.sql",
            op,
            param_count,
            sql = %sql,
        );
    }
}

impl<E: Executor> Executor for TracingExecutor<E> {
    async fn fetch(&self, sql: &str, values: &[Value]) -> Result<Vec<Row>> {
        self.emit("fetch", sql, values.len());
        self.inner.fetch(sql, values).await
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> Result<u64> {
        self.emit("execute", sql, values.len());
        self.inner.execute(sql, values).await
    }
}
