//! `Authorization` header computation for basic and bearer credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use restproxy_application::ports::{AuthError, AuthHeader, AuthHeaderProvider};
use restproxy_domain::{AuthConfig, Config};

/// Builds `Basic base64(email:token)` or `Bearer token` headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAuthProvider;

impl StandardAuthProvider {
    /// Creates the provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AuthHeaderProvider for StandardAuthProvider {
    fn create_auth_header(&self, config: &Config) -> Result<AuthHeader, AuthError> {
        match &config.auth {
            AuthConfig::Basic { email, api_token } => {
                require("basic", "email", email)?;
                require("basic", "api token", api_token)?;
                let encoded = STANDARD.encode(format!("{email}:{api_token}"));
                Ok(AuthHeader::new("Basic", encoded))
            }
            AuthConfig::Bearer { token } => {
                require("bearer", "token", token)?;
                Ok(AuthHeader::new("Bearer", token.as_str()))
            }
        }
    }
}

fn require(mode: &'static str, field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingCredential { mode, field });
    }
    Ok(())
}
