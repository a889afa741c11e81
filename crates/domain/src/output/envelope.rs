//! The normalized `{success, data, error, meta}` response wrapper.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::taxonomy::ErrorCode;

/// Hint attached to errors that came back from the server.
pub const VERBOSE_HINT: &str = "Re-run with --verbose to see request and retry diagnostics.";

/// The rendered outcome of one command.
///
/// `data` is set only when `success` is true (and may still be null for an
/// empty body); `error` is set only when `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the server answered with a success status.
    pub success: bool,
    /// Response payload.
    pub data: Option<Value>,
    /// Failure description.
    pub error: Option<EnvelopeError>,
    /// Observational metadata.
    pub meta: Meta,
}

impl Envelope {
    /// Creates a successful envelope.
    #[must_use]
    pub const fn success(data: Option<Value>, meta: Meta) -> Self {
        Self {
            success: true,
            data,
            error: None,
            meta,
        }
    }

    /// Creates a failed envelope.
    #[must_use]
    pub const fn failure(error: EnvelopeError, meta: Meta) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            meta,
        }
    }

    /// Returns a copy with `data` replaced.
    #[must_use]
    pub fn with_data(&self, data: Option<Value>) -> Self {
        Self {
            success: self.success,
            data,
            error: self.error.clone(),
            meta: self.meta.clone(),
        }
    }
}

/// Error body of a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Taxonomy code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Parsed server response body, if any.
    pub details: Option<Value>,
    /// Suggestion for the user.
    pub hint: Option<String>,
}

impl EnvelopeError {
    /// Creates an error with no details or hint.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    /// Attaches details.
    #[must_use]
    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Observational metadata; never drives control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Tool version.
    pub version: String,
    /// Server-assigned request id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Wall-clock duration of the whole command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// HTTP status of the final response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// HTTP method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request path as given by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Meta {
    /// Creates metadata carrying only the version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }
}
