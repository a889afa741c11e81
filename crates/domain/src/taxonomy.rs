//! Error taxonomy: named error codes and the process exit codes they map to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Process exit codes. The numeric values are a fixed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ExitCode {
    /// The command completed.
    #[default]
    Success = 0,
    /// Bad input, rejected precondition, or an unclassified client error.
    Validation = 1,
    /// Missing or insufficient credentials.
    Authentication = 2,
    /// The resource does not exist.
    NotFound = 3,
    /// The request conflicts with server state.
    Conflict = 4,
    /// The server could not be reached, timed out, or throttled us.
    Network = 5,
    /// Upstream failure or a bug on our side.
    Internal = 10,
}

impl ExitCode {
    /// Returns the numeric process exit code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns true for the success code.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Machine-readable error codes rendered in `error.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid input or an unclassified client error.
    ValidationError,
    /// HTTP 401.
    AuthenticationError,
    /// HTTP 403.
    AuthorizationError,
    /// HTTP 404.
    NotFound,
    /// HTTP 409 or 422.
    Conflict,
    /// HTTP 408, a transport timeout, or cancellation.
    Timeout,
    /// HTTP 429 or a transport failure.
    NetworkError,
    /// HTTP 5xx.
    UpstreamError,
    /// Anything we did not anticipate.
    InternalError,
}

impl ErrorCode {
    /// Returns the wire name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::AuthenticationError => "authentication_error",
            Self::AuthorizationError => "authorization_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
            Self::UpstreamError => "upstream_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a failure that prevented us from getting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The attempt exceeded its timeout.
    Timeout,
    /// The operation was cancelled, e.g. by an interrupt.
    Cancelled,
    /// Connection, DNS, TLS or other transport failure.
    Transport,
    /// Anything else.
    Internal,
}

/// Maps a non-success HTTP status to its exit and error codes.
#[must_use]
pub const fn classify_status(status: u16) -> (ExitCode, ErrorCode) {
    match status {
        400 => (ExitCode::Validation, ErrorCode::ValidationError),
        401 => (ExitCode::Authentication, ErrorCode::AuthenticationError),
        403 => (ExitCode::Authentication, ErrorCode::AuthorizationError),
        404 => (ExitCode::NotFound, ErrorCode::NotFound),
        409 | 422 => (ExitCode::Conflict, ErrorCode::Conflict),
        408 => (ExitCode::Network, ErrorCode::Timeout),
        429 => (ExitCode::Network, ErrorCode::NetworkError),
        500.. => (ExitCode::Internal, ErrorCode::UpstreamError),
        _ => (ExitCode::Validation, ErrorCode::ValidationError),
    }
}

/// Maps a failure to its exit and error codes.
#[must_use]
pub const fn classify_failure(kind: FailureKind) -> (ExitCode, ErrorCode) {
    match kind {
        FailureKind::Timeout | FailureKind::Cancelled => (ExitCode::Network, ErrorCode::Timeout),
        FailureKind::Transport => (ExitCode::Network, ErrorCode::NetworkError),
        FailureKind::Internal => (ExitCode::Internal, ErrorCode::InternalError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exit_code_values() {
        let codes: Vec<i32> = [
            ExitCode::Success,
            ExitCode::Validation,
            ExitCode::Authentication,
            ExitCode::NotFound,
            ExitCode::Conflict,
            ExitCode::Network,
            ExitCode::Internal,
        ]
        .iter()
        .map(|c| c.as_i32())
        .collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5, 10]);
    }

    #[test]
    fn test_classify_status_table() {
        let cases = [
            (400, ExitCode::Validation, "validation_error"),
            (401, ExitCode::Authentication, "authentication_error"),
            (403, ExitCode::Authentication, "authorization_error"),
            (404, ExitCode::NotFound, "not_found"),
            (409, ExitCode::Conflict, "conflict"),
            (422, ExitCode::Conflict, "conflict"),
            (408, ExitCode::Network, "timeout"),
            (429, ExitCode::Network, "network_error"),
            (500, ExitCode::Internal, "upstream_error"),
            (503, ExitCode::Internal, "upstream_error"),
            (418, ExitCode::Validation, "validation_error"),
            (302, ExitCode::Validation, "validation_error"),
        ];
        for (status, exit, code) in cases {
            let (actual_exit, actual_code) = classify_status(status);
            assert_eq!(actual_exit, exit, "status {status}");
            assert_eq!(actual_code.as_str(), code, "status {status}");
        }
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(
            classify_failure(FailureKind::Timeout),
            (ExitCode::Network, ErrorCode::Timeout)
        );
        assert_eq!(
            classify_failure(FailureKind::Cancelled),
            (ExitCode::Network, ErrorCode::Timeout)
        );
        assert_eq!(
            classify_failure(FailureKind::Transport),
            (ExitCode::Network, ErrorCode::NetworkError)
        );
        assert_eq!(
            classify_failure(FailureKind::Internal),
            (ExitCode::Internal, ErrorCode::InternalError)
        );
    }

    #[test]
    fn test_error_code_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorCode::UpstreamError).unwrap_or_default();
        assert_eq!(json, "\"upstream_error\"");
    }
}
