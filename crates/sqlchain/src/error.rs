//! Error types for sqlchain

use thiserror::Error;

/// Result type alias for sqlchain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while building or rendering a query chain.
///
/// Every user-facing builder failure lands here. The variants only split
/// "this argument shape is not understood" from "this method is illegal here"
/// and a handful of internal consistency checks; the message carries the
/// details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBuilderError {
    /// An argument shape, list length or object key set was not understood.
    #[error("{0}")]
    InvalidArgument(String),

    /// A method was called where the current query kind does not allow it.
    #[error("{0}")]
    NotAllowed(String),

    /// A clause received an argument shape it has no handler for.
    #[error("{handler}() is not implemented in base class for \"{method}\"")]
    NotImplemented {
        method: &'static str,
        handler: &'static str,
    },

    /// No clause is registered under this method name.
    #[error("Invalid query builder method: {0}")]
    UnknownMethod(String),

    /// A clause asked for a message tag missing from its message table.
    #[error("Invalid message \"{tag}\" requested by query builder \"{method}\" component")]
    MissingMessage {
        method: &'static str,
        tag: String,
    },

    /// Placeholder count and bind value count diverged.
    #[error("Placeholder count ({placeholders}) does not match bind value count ({values})")]
    BindMismatch { placeholders: usize, values: usize },

    /// Fewer extra values were supplied than deferred placeholders need.
    #[error("Query expects {expected} extra value(s) for deferred placeholders, got {got}")]
    MissingValues { expected: usize, got: usize },

    /// The active dialect cannot express this clause.
    #[error("{0}")]
    Unsupported(String),
}

impl QueryBuilderError {
    /// Returns `true` for "method is illegal here" failures.
    pub fn is_not_allowed(&self) -> bool {
        matches!(self, Self::NotAllowed(_))
    }

    /// Returns `true` for argument shape failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Error types for query building and execution
#[derive(Debug, Error)]
pub enum Error {
    /// Query construction error
    #[error("Query builder error: {0}")]
    Builder(#[from] QueryBuilderError),

    /// Query execution error
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The builder error, if this is one.
    pub fn as_builder(&self) -> Option<&QueryBuilderError> {
        match self {
            Self::Builder(err) => Some(err),
            _ => None,
        }
    }
}
