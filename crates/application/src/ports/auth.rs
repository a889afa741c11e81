//! Authentication header port.

use std::fmt;

use restproxy_domain::Config;
use thiserror::Error;

/// Errors building an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A credential needed by the configured mode is empty.
    #[error("missing credential for {mode} authentication: {field}")]
    MissingCredential {
        /// Authentication mode.
        mode: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },
}

/// A computed `Authorization` header, e.g. scheme `Basic` and an encoded
/// value.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Authorization scheme.
    pub scheme: String,
    /// Credentials in the scheme's encoding.
    pub value: String,
}

impl AuthHeader {
    /// Creates a header value.
    #[must_use]
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            value: value.into(),
        }
    }

    /// Returns the full header value, `<scheme> <value>`.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.value)
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("scheme", &self.scheme)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Turns configured credentials into an `Authorization` header.
pub trait AuthHeaderProvider: Send + Sync {
    /// Computes the header for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured credentials are incomplete.
    fn create_auth_header(&self, config: &Config) -> Result<AuthHeader, AuthError>;
}
