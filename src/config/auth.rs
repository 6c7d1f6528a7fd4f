//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (Firebase ID tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Firebase project id; the expected `aud` claim
    pub firebase_project_id: String,

    /// Key set used to verify token signatures
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    /// Get JWKS cache TTL as Duration
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Expected `iss` claim for this project
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.firebase_project_id)
    }

    /// Validate authentication configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.firebase_project_id.is_empty() {
            return Err(ValidationError::MissingRequired("FIREBASE_PROJECT_ID"));
        }
        if self.jwks_url.is_empty() {
            return Err(ValidationError::MissingRequired("JWKS_URL"));
        }
        if *environment == Environment::Production && !self.jwks_url.starts_with("https://") {
            return Err(ValidationError::JwksUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            firebase_project_id: String::new(),
            jwks_url: default_jwks_url(),
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.jwks_cache_ttl_secs, 3600);
        assert!(config.jwks_url.starts_with("https://www.googleapis.com/"));
    }

    #[test]
    fn test_issuer_includes_project() {
        let config = AuthConfig {
            firebase_project_id: "loan-desk-dev".to_string(),
            ..Default::default()
        };
        assert_eq!(config.issuer(), "https://securetoken.google.com/loan-desk-dev");
    }

    #[test]
    fn test_jwks_cache_ttl_duration() {
        let config = AuthConfig {
            jwks_cache_ttl_secs: 7200,
            ..Default::default()
        };
        assert_eq!(config.jwks_cache_ttl(), Duration::from_secs(7200));
    }

    #[test]
    fn test_validation_missing_project() {
        let config = AuthConfig::default();
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("FIREBASE_PROJECT_ID"))
        );
    }

    #[test]
    fn test_production_requires_https_jwks() {
        let config = AuthConfig {
            firebase_project_id: "loan-desk".to_string(),
            jwks_url: "http://localhost:9099/jwks".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwksUrlMustBeHttps)
        );
    }
}
