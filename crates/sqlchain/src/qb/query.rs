//! Run-time checked chain handle.

use crate::arg::Arg;
use crate::chain::Node;
use crate::clause::{Clause, QueryKind};
use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::QueryBuilderError;
use crate::qb::traits::SqlQuery;
use crate::registry::Registry;
use std::sync::Arc;

/// A chain plus the registry and dialect it renders with.
///
/// [`call`](Query::call) adds a node for any registered method, checking it
/// against the query kind the chain has started. The typed stages
/// ([`QueryBuilder`](crate::qb::QueryBuilder), [`SelectQuery`](crate::qb::SelectQuery), ...)
/// wrap a `Query` and only expose the methods legal for their kind.
#[derive(Clone)]
pub struct Query {
    node: Arc<Node>,
    registry: Arc<Registry>,
    dialect: Arc<dyn Dialect>,
    kind: Option<QueryKind>,
    error: Option<QueryBuilderError>,
}

impl Query {
    /// A fresh chain on the shared standard registry.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::with_registry(Registry::shared_standard(), dialect)
    }

    /// A fresh chain on `registry`.
    pub fn with_registry(registry: Arc<Registry>, dialect: impl Dialect + 'static) -> Self {
        Self::from_parts(registry, Arc::new(dialect))
    }

    pub fn from_parts(registry: Arc<Registry>, dialect: Arc<dyn Dialect>) -> Self {
        let node = Node::root(registry.root());
        Self {
            node,
            registry,
            dialect,
            kind: None,
            error: None,
        }
    }

    /// Add a node for `method`.
    ///
    /// Fails with [`QueryBuilderError::UnknownMethod`] for an unregistered
    /// name and [`QueryBuilderError::NotAllowed`] when the method is not
    /// legal for the chain's query kind. Argument shapes are checked when
    /// the chain is resolved.
    pub fn call(&self, method: &str, args: Vec<Arg>) -> Result<Query, QueryBuilderError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let clause = self
            .registry
            .lookup(method)
            .ok_or_else(|| QueryBuilderError::UnknownMethod(method.to_string()))?;
        self.check_allowed(method, clause.as_ref())?;
        let kind = self.kind.or(clause.query_kind());
        Ok(Query {
            node: self.node.child(clause, args),
            registry: Arc::clone(&self.registry),
            dialect: Arc::clone(&self.dialect),
            kind,
            error: None,
        })
    }

    /// Like [`call`](Query::call), but keeps the first failure inside the
    /// query so it surfaces from the terminal call.
    pub(crate) fn chain(self, method: &str, args: Vec<Arg>) -> Query {
        match self.call(method, args) {
            Ok(next) => next,
            Err(err) => Query {
                error: Some(err),
                ..self
            },
        }
    }

    fn check_allowed(&self, method: &str, clause: &dyn Clause) -> Result<(), QueryBuilderError> {
        let Some(kind) = self.kind else {
            return Ok(());
        };
        let starts_other = clause.query_kind().is_some_and(|k| k != kind);
        let listed = kind.allows(clause.method()) || clause.valid_for().contains(&kind);
        if listed && !starts_other {
            return Ok(());
        }
        Err(QueryBuilderError::NotAllowed(format!(
            "The \"{method}\" method is not allowed in {} {} query",
            kind.article(),
            kind.name()
        )))
    }

    /// Resolve the chain, surfacing any deferred builder error first.
    pub fn resolve(&self) -> Result<Arc<Context>, QueryBuilderError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.node.resolve_chain(self.dialect.as_ref())
    }

    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// The statement kind started so far.
    pub fn kind(&self) -> Option<QueryKind> {
        self.kind
    }

    /// The first error recorded by a typed stage method, if any.
    pub fn error(&self) -> Option<&QueryBuilderError> {
        self.error.as_ref()
    }
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("dialect", &self.dialect.name())
            .field("kind", &self.kind)
            .field("depth", &self.node.depth())
            .field("error", &self.error)
            .finish()
    }
}

impl SqlQuery for Query {
    fn query(&self) -> &Query {
        self
    }
}
