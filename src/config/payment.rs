//! Payment configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment configuration (Stripe Checkout)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: String,

    /// Stripe REST base URL
    #[serde(default = "default_api_base_url")]
    pub stripe_api_base_url: String,

    /// Currency for processing fees, lowercase ISO 4217
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Timeout for calls to Stripe
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.http_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_api_base_url: default_api_base_url(),
            currency: default_currency(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_http_timeout() -> u64 {
    20
}
