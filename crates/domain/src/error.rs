//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header could not be parsed from its `name:value` form.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A query parameter could not be parsed from its `key=value` form.
    #[error("invalid query parameter: {0}")]
    InvalidQuery(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body is invalid for the given content type.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// An output expression (select, filter, sort) is malformed.
    #[error("invalid {kind} expression '{expression}': {reason}")]
    InvalidExpression {
        /// Which expression was being parsed.
        kind: &'static str,
        /// The raw expression text.
        expression: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Output options were combined in an unsupported way.
    #[error("invalid output options: {0}")]
    InvalidOutputOptions(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
