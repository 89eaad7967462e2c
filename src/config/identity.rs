//! Identity provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Identity provider configuration (Firebase Auth)
///
/// Credentials are held as [`SecretString`] so a stray `Debug` print of the
/// loaded configuration redacts them.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Firebase project id; doubles as the expected token audience
    pub project_id: String,

    /// Web API key for Identity Toolkit account creation
    pub api_key: SecretString,

    /// OAuth bearer token for privileged Identity Toolkit calls
    pub admin_token: SecretString,

    /// How long to cache token signing keys, in seconds
    #[serde(default = "default_jwks_cache_secs")]
    pub jwks_cache_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: SecretString::new(String::new()),
            admin_token: SecretString::new(String::new()),
            jwks_cache_secs: u64::default(),
        }
    }
}

impl IdentityConfig {
    /// Validate identity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__PROJECT_ID"));
        }
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__API_KEY"));
        }
        if self.admin_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__ADMIN_TOKEN"));
        }
        if self.jwks_cache_secs == 0 {
            return Err(ValidationError::InvalidJwksCacheDuration);
        }
        Ok(())
    }
}

fn default_jwks_cache_secs() -> u64 {
    3600
}
