//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `GASTOS_` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use gastos_backend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod error;
mod gateway;
mod identity;
mod server;
mod store;

pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;
pub use identity::IdentityConfig;
pub use server::{Environment, ServerConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Identity provider configuration (Firebase Auth)
    pub identity: IdentityConfig,

    /// Document store configuration (Firestore)
    pub store: StoreConfig,

    /// Payment gateway configuration (Mercado Pago)
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GASTOS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GASTOS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GASTOS__GATEWAY__ACCESS_TOKEN=...` -> `gateway.access_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are
    /// missing or cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GASTOS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.identity.validate()?;
        self.store.validate()?;
        self.gateway.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("GASTOS__IDENTITY__PROJECT_ID", "demo-project");
        env::set_var("GASTOS__IDENTITY__API_KEY", "AIzaTest");
        env::set_var("GASTOS__IDENTITY__ADMIN_TOKEN", "ya29.test");
        env::set_var("GASTOS__STORE__PROJECT_ID", "demo-project");
        env::set_var("GASTOS__STORE__ACCESS_TOKEN", "ya29.test");
        env::set_var("GASTOS__GATEWAY__ACCESS_TOKEN", "APP_USR-test");
    }

    fn clear_env() {
        env::remove_var("GASTOS__IDENTITY__PROJECT_ID");
        env::remove_var("GASTOS__IDENTITY__API_KEY");
        env::remove_var("GASTOS__IDENTITY__ADMIN_TOKEN");
        env::remove_var("GASTOS__STORE__PROJECT_ID");
        env::remove_var("GASTOS__STORE__ACCESS_TOKEN");
        env::remove_var("GASTOS__GATEWAY__ACCESS_TOKEN");
        env::remove_var("GASTOS__SERVER__PORT");
    }

    #[test]
    fn loads_with_minimal_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();

        let config = AppConfig::load().expect("should load from env");
        assert_eq!(config.identity.project_id, "demo-project");
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    fn server_overrides_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GASTOS__SERVER__PORT", "3000");

        let config = AppConfig::load().expect("should load from env");
        assert_eq!(config.server.port, 3000);

        clear_env();
    }
}
