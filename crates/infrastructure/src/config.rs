//! Configuration loaded from `RESTPROXY_*` environment variables.

use std::collections::HashMap;

use restproxy_domain::config::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_TIMEOUT_SECONDS,
};
use restproxy_domain::{AuthConfig, Config};
use thiserror::Error;
use url::Url;

/// Prefix shared by every variable the loader reads.
pub const ENV_PREFIX: &str = "RESTPROXY_";

/// Base site URL.
pub const BASE_URL: &str = "RESTPROXY_BASE_URL";
/// `basic` (default) or `bearer`.
pub const AUTH_MODE: &str = "RESTPROXY_AUTH_MODE";
/// Account email for basic auth.
pub const EMAIL: &str = "RESTPROXY_EMAIL";
/// API token for basic auth.
pub const API_TOKEN: &str = "RESTPROXY_API_TOKEN";
/// Token for bearer auth.
pub const BEARER_TOKEN: &str = "RESTPROXY_BEARER_TOKEN";
/// Per-attempt timeout in seconds.
pub const TIMEOUT_SECONDS: &str = "RESTPROXY_TIMEOUT_SECONDS";
/// Retries after the first attempt.
pub const MAX_RETRIES: &str = "RESTPROXY_MAX_RETRIES";
/// Base backoff delay in milliseconds.
pub const RETRY_BASE_DELAY_MS: &str = "RESTPROXY_RETRY_BASE_DELAY_MS";

/// Errors loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable has a value that cannot be used.
    #[error("{name} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What was wrong.
        reason: String,
    },
}

/// Builds a [`Config`] from a snapshot of environment variables.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use restproxy_infrastructure::EnvConfigLoader;
///
/// let vars = HashMap::from([
///     ("RESTPROXY_BASE_URL".to_string(), "https://example.atlassian.net".to_string()),
///     ("RESTPROXY_AUTH_MODE".to_string(), "bearer".to_string()),
///     ("RESTPROXY_BEARER_TOKEN".to_string(), "pat".to_string()),
/// ]);
/// let config = EnvConfigLoader::new(vars).load().unwrap();
/// assert_eq!(config.max_retries, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvConfigLoader {
    vars: HashMap<String, String>,
}

impl EnvConfigLoader {
    /// Creates a loader over the given variables.
    #[must_use]
    pub const fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Snapshots the `RESTPROXY_*` variables of the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::vars()
                .filter(|(key, _)| key.starts_with(ENV_PREFIX))
                .collect(),
        )
    }

    /// Validates the variables and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is missing or
    /// invalid.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let base_url = self.base_url()?;
        let auth = self.auth()?;

        let timeout_seconds = self.number(TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS)?;
        if timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                name: TIMEOUT_SECONDS,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            base_url,
            auth,
            timeout_seconds,
            max_retries: self.number(MAX_RETRIES, DEFAULT_MAX_RETRIES)?,
            retry_base_delay_ms: self.number(RETRY_BASE_DELAY_MS, DEFAULT_RETRY_BASE_DELAY_MS)?,
        })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<&str, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.required(BASE_URL)?;
        let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
            name: BASE_URL,
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                name: BASE_URL,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    fn auth(&self) -> Result<AuthConfig, ConfigError> {
        match self.get(AUTH_MODE).map(str::to_ascii_lowercase).as_deref() {
            None | Some("basic") => Ok(AuthConfig::basic(
                self.required(EMAIL)?,
                self.required(API_TOKEN)?,
            )),
            Some("bearer") => Ok(AuthConfig::bearer(self.required(BEARER_TOKEN)?)),
            Some(other) => Err(ConfigError::Invalid {
                name: AUTH_MODE,
                reason: format!("expected 'basic' or 'bearer', got '{other}'"),
            }),
        }
    }

    fn number<T: std::str::FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        self.get(name).map_or(Ok(default), |raw| {
            raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: format!("'{raw}': {e}"),
            })
        })
    }
}
