//! Application error types

use restproxy_domain::{DomainError, FailureKind};
use thiserror::Error;

use crate::ports::{AuthError, FileSystemError, HttpClientError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed before a response arrived.
    #[error("{0}")]
    Http(#[from] HttpClientError),

    /// The `Authorization` header could not be built.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Writing or reading a local file failed.
    #[error("{0}")]
    FileSystem(#[from] FileSystemError),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request was rejected before anything was sent.
    #[error("{0}")]
    Precondition(String),

    /// A paginated response did not have the expected shape.
    #[error("pagination failed: {0}")]
    Pagination(String),

    /// The operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

impl ApplicationError {
    /// Classifies the error for the error taxonomy.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Http(error) => error.failure_kind(),
            Self::Cancelled => FailureKind::Cancelled,
            Self::Domain(_)
            | Self::Auth(_)
            | Self::FileSystem(_)
            | Self::Json(_)
            | Self::Precondition(_)
            | Self::Pagination(_) => FailureKind::Internal,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
