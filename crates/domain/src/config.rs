//! Target configuration for one invocation.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 100;
/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for exponential backoff.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// Credentials used to build the `Authorization` header.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthConfig {
    /// HTTP basic authentication with an account email and API token.
    Basic {
        /// Account email or user name.
        email: String,
        /// API token used as the password.
        api_token: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The token.
        token: String,
    },
}

impl AuthConfig {
    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::Basic {
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Returns the mode name.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { email, .. } => f
                .debug_struct("Basic")
                .field("email", email)
                .field("api_token", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Where and how to send requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base site URL; request paths are appended to it.
    pub base_url: Url,
    /// Credentials.
    pub auth: AuthConfig,
    /// Per-attempt timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff, in milliseconds.
    pub retry_base_delay_ms: u64,
}

impl Config {
    /// Creates a configuration with default timeout and retry settings.
    #[must_use]
    pub const fn new(base_url: Url, auth: AuthConfig) -> Self {
        Self {
            base_url,
            auth,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }

    /// Total attempts allowed for one logical request.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Base backoff delay.
    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config::new(
            Url::parse("https://example.atlassian.net").unwrap(),
            AuthConfig::basic("me@example.com", "secret-token"),
        )
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.max_attempts(), 4);
        assert_eq!(config.timeout(), Duration::from_secs(100));
        assert_eq!(config.retry_base_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_max_attempts_never_zero() {
        let config = Config {
            max_retries: 0,
            ..config()
        };
        assert_eq!(config.max_attempts(), 1);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("me@example.com"));

        let bearer = format!("{:?}", AuthConfig::bearer("tok-123"));
        assert!(!bearer.contains("tok-123"));
    }
}
