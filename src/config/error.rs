//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Site domain must be an http(s) URL without a trailing slash")]
    InvalidSiteDomain,

    #[error("Site domain must use HTTPS in production")]
    SiteDomainMustBeHttps,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("In-memory store is not allowed in production")]
    InMemoryStoreInProduction,

    #[error("JWKS URL must use HTTPS in production")]
    JwksUrlMustBeHttps,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,
}
