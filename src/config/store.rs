//! Document store configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Document store configuration (Firestore REST)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// GCP project id owning the database
    pub project_id: String,

    /// OAuth bearer token for Firestore REST calls
    pub access_token: SecretString,

    /// Base URL override (for emulator/testing)
    pub base_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            access_token: SecretString::new(String::new()),
            base_url: None,
        }
    }
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::MissingRequired("STORE__PROJECT_ID"));
        }
        if self.access_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("STORE__ACCESS_TOKEN"));
        }
        Ok(())
    }
}
