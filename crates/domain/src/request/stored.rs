//! Persisted request snapshot for save and replay.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_ACCEPT, Headers, HttpMethod, QueryParams, RequestCommandOptions};

/// The HTTP portion of a command, saved so it can be replayed later.
///
/// Execution policy (confirmation, retries, output) is not stored; it is
/// supplied again at replay time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Query pairs in their original order.
    #[serde(default)]
    pub query: QueryParams,
    /// Header pairs in their original order.
    #[serde(default)]
    pub headers: Headers,
    /// `Accept` header value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    /// Explicit `Content-Type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl StoredRequest {
    /// Captures the HTTP portion of `options`.
    #[must_use]
    pub fn from_options(options: &RequestCommandOptions) -> Self {
        Self {
            method: options.method,
            path: options.path.clone(),
            query: options.query.clone(),
            headers: options.headers.clone(),
            accept: Some(options.accept.clone()),
            content_type: options.content_type.clone(),
            body: options.body.clone(),
        }
    }

    /// Rebuilds command options with default execution policy.
    #[must_use]
    pub fn into_options(self) -> RequestCommandOptions {
        let mut options = RequestCommandOptions::new(self.method, self.path);
        options.query = self.query;
        options.headers = self.headers;
        options.accept = self.accept.unwrap_or_else(|| DEFAULT_ACCEPT.to_string());
        options.content_type = self.content_type;
        options.body = self.body;
        options
    }
}
