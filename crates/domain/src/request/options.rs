//! One HTTP call plus the policy flags that govern how it is executed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod, QueryParams};
use crate::output::OutputPreferences;

/// Default `Accept` header value.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Everything the executor needs to know about one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCommandOptions {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the configured base URL, or an absolute URL.
    pub path: String,
    /// Query parameters.
    #[serde(default)]
    pub query: QueryParams,
    /// Caller-supplied headers; these win over generated ones.
    #[serde(default)]
    pub headers: Headers,
    /// `Accept` header value.
    pub accept: String,
    /// Explicit `Content-Type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Write the raw response body to this file instead of parsing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_path: Option<PathBuf>,
    /// Output transformation and rendering.
    #[serde(default)]
    pub output: OutputPreferences,
    /// Reflect HTTP error statuses in the exit code.
    pub fail_on_non_success: bool,
    /// Allow retrying POST and PATCH.
    #[serde(default)]
    pub retry_non_idempotent: bool,
    /// Follow `startAt` pagination and merge the pages.
    #[serde(default)]
    pub paginate: bool,
    /// The user confirmed a mutating request.
    #[serde(default)]
    pub confirmed: bool,
}

impl RequestCommandOptions {
    /// Creates options with defaults: JSON accept, fail on non-success, no
    /// pagination, unconfirmed.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: Headers::new(),
            accept: DEFAULT_ACCEPT.to_string(),
            content_type: None,
            body: None,
            out_path: None,
            output: OutputPreferences::default(),
            fail_on_non_success: true,
            retry_non_idempotent: false,
            paginate: false,
            confirmed: false,
        }
    }

    /// Creates GET options for `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Returns true if pagination was requested by flag or by `--all`.
    #[must_use]
    pub const fn wants_pagination(&self) -> bool {
        self.paginate || self.output.all
    }
}
