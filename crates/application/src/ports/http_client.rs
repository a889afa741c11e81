//! HTTP Client port

use std::future::Future;

use restproxy_domain::{FailureKind, request::RequestSpec, response::ResponseSpec};
use thiserror::Error;

/// Errors raised while sending a request, before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The attempt exceeded its timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// DNS resolution failed.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host being resolved.
        host: String,
        /// Underlying error text.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed or broke while exchanging data.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Any other client failure.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns true if the attempt timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true for network transport failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::DnsError { .. } | Self::ConnectionRefused { .. } | Self::ConnectionFailed(_)
        )
    }

    /// Classifies the error for the error taxonomy.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Cancelled => FailureKind::Cancelled,
            Self::DnsError { .. } | Self::ConnectionRefused { .. } | Self::ConnectionFailed(_) => {
                FailureKind::Transport
            }
            Self::InvalidUrl(_) | Self::TooManyRedirects { .. } | Self::Other(_) => {
                FailureKind::Internal
            }
        }
    }
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Sends one attempt of a request and returns the response, whatever
    /// its status.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received because of network
    /// issues, a timeout, or an invalid request.
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}
