//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `LOAN_DESK` prefix and
//! `__` between nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use loan_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, site domain)
    #[serde(default)]
    pub server: ServerConfig,

    /// Store configuration (PostgreSQL or in-memory)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Identity provider configuration (Firebase)
    pub auth: AuthConfig,

    /// Payment processor configuration (Stripe)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` when present, then every `LOAN_DESK__SECTION__KEY`
    /// variable:
    ///
    /// - `LOAN_DESK__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `LOAN_DESK__PAYMENT__STRIPE_API_KEY=sk_test_...` -> `payment.stripe_api_key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LOAN_DESK")
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
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = &self.server.environment;
        self.server.validate()?;
        self.database.validate(environment)?;
        self.auth.validate(environment)?;
        self.payment.validate()?;
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

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LOAN_DESK__DATABASE__URL",
        "LOAN_DESK__DATABASE__IN_MEMORY",
        "LOAN_DESK__AUTH__FIREBASE_PROJECT_ID",
        "LOAN_DESK__PAYMENT__STRIPE_API_KEY",
        "LOAN_DESK__PAYMENT__CURRENCY",
        "LOAN_DESK__SERVER__PORT",
        "LOAN_DESK__SERVER__ENVIRONMENT",
        "LOAN_DESK__SERVER__SITE_DOMAIN",
    ];

    fn set_minimal_env() {
        env::set_var("LOAN_DESK__DATABASE__URL", "postgresql://test@localhost/loans");
        env::set_var("LOAN_DESK__AUTH__FIREBASE_PROJECT_ID", "loan-desk-test");
        env::set_var("LOAN_DESK__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/loans");
        assert_eq!(config.auth.firebase_project_id, "loan-desk-test");
        assert_eq!(config.payment.currency, "usd");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_production_rejects_plain_http_site() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("LOAN_DESK__SERVER__ENVIRONMENT", "production");
        env::set_var("LOAN_DESK__SERVER__SITE_DOMAIN", "http://loans.example.com");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::SiteDomainMustBeHttps)
        );
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("LOAN_DESK__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_in_memory_store_without_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LOAN_DESK__DATABASE__IN_MEMORY", "true");
        env::set_var("LOAN_DESK__AUTH__FIREBASE_PROJECT_ID", "loan-desk-test");
        env::set_var("LOAN_DESK__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.database.in_memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_payment_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LOAN_DESK__AUTH__FIREBASE_PROJECT_ID", "loan-desk-test");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
