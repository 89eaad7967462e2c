//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration (Mercado Pago)
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Mercado Pago access token
    pub access_token: SecretString,

    /// Webhook signing secret. Configured for forward compatibility;
    /// signatures are currently observed, not enforced.
    pub webhook_secret: Option<SecretString>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            access_token: SecretString::new(String::new()),
            webhook_secret: None,
        }
    }
}

impl GatewayConfig {
    /// Check if using a test-mode access token
    pub fn is_test_mode(&self) -> bool {
        self.access_token.expose_secret().starts_with("TEST-")
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let token = self.access_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__ACCESS_TOKEN"));
        }

        // Production tokens are APP_USR-prefixed, sandbox ones TEST-prefixed
        if !token.starts_with("APP_USR-") && !token.starts_with("TEST-") {
            return Err(ValidationError::InvalidGatewayToken);
        }

        Ok(())
    }
}
