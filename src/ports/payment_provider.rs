//! Payment provider port for hosted checkout.
//!
//! Defines the contract for the payment processor (Stripe Checkout in
//! production). The service only ever creates a checkout session and later
//! reads it back; settlement happens on the processor's side.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::LendingError;

/// Metadata key carrying the loan application id.
pub const METADATA_APPLICATION_ID: &str = "applicationId";

/// Metadata key carrying the loan title.
pub const METADATA_LOAN_NAME: &str = "loanName";

/// `payment_status` value of a settled session.
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Port for the hosted-checkout payment processor.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session for a one-off fee.
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Read the current state of a checkout session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session id is unknown to the processor
    /// - `NetworkError` / `ProviderUnavailable` / `RateLimitExceeded` on
    ///   transient failures (retryable)
    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSessionState, PaymentError>;
}

/// Request for a single-line-item checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub application_id: String,
    pub loan_title: String,
    /// Price in minor units (cents).
    pub unit_amount: i64,
    pub currency: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionRequest {
    /// Metadata attached to the session and echoed back on retrieval.
    pub fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                METADATA_APPLICATION_ID.to_string(),
                self.application_id.clone(),
            ),
            (METADATA_LOAN_NAME.to_string(), self.loan_title.clone()),
        ])
    }
}

/// Newly created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider session id (cs_...).
    pub id: String,

    /// Hosted payment page to redirect the payer to.
    pub url: String,
}

/// Snapshot of a checkout session as the processor reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutSessionState {
    pub id: String,
    /// Payment intent id; present once the payer submitted payment.
    pub payment_intent: Option<String>,
    pub payment_status: String,
    /// Total charged, in minor units.
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl CheckoutSessionState {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAYMENT_STATUS_PAID
    }

    pub fn application_id(&self) -> Option<&str> {
        self.metadata
            .get(METADATA_APPLICATION_ID)
            .map(String::as_str)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn loan_name(&self) -> Option<&str> {
        self.metadata.get(METADATA_LOAN_NAME).map(String::as_str)
    }
}

/// Payment provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a not found error for the given provider object id.
    pub fn not_found(id: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, id).with_provider_code("resource_missing")
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Classify a non-success HTTP status from the processor.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let code = match status {
            401 | 403 => PaymentErrorCode::AuthenticationError,
            404 => PaymentErrorCode::NotFound,
            400 | 402 | 422 => PaymentErrorCode::InvalidRequest,
            429 => PaymentErrorCode::RateLimitExceeded,
            500..=599 => PaymentErrorCode::ProviderUnavailable,
            _ => PaymentErrorCode::ProviderError,
        };
        Self::new(code, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for LendingError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::NotFound => LendingError::not_found("checkout session", err.message),
            _ => LendingError::upstream(err.to_string(), err.retryable),
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// The processor rejected the request parameters.
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Processor returned a 5xx.
    ProviderUnavailable,

    /// Unexpected provider response.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderUnavailable
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderUnavailable => "provider_unavailable",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());
        assert!(PaymentErrorCode::ProviderUnavailable.is_retryable());

        assert!(!PaymentErrorCode::InvalidRequest.is_retryable());
        assert!(!PaymentErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn from_status_classifies() {
        assert_eq!(PaymentError::from_status(404, "x").code, PaymentErrorCode::NotFound);
        assert_eq!(
            PaymentError::from_status(429, "x").code,
            PaymentErrorCode::RateLimitExceeded
        );
        assert!(PaymentError::from_status(503, "x").retryable);
        assert!(!PaymentError::from_status(400, "x").retryable);
        assert_eq!(
            PaymentError::from_status(401, "x").code,
            PaymentErrorCode::AuthenticationError
        );
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::network("connection reset");
        assert_eq!(err.to_string(), "network_error: connection reset");
    }

    #[test]
    fn converts_to_lending_error() {
        let err: LendingError = PaymentError::network("reset").into();
        assert!(err.is_retryable());

        let err: LendingError = PaymentError::not_found("cs_missing").into();
        assert!(matches!(err, LendingError::NotFound { .. }));
    }

    #[test]
    fn session_state_helpers() {
        let state = CheckoutSessionState {
            payment_status: "paid".to_string(),
            metadata: HashMap::from([
                ("applicationId".to_string(), "A1".to_string()),
                ("loanName".to_string(), "Home Loan".to_string()),
            ]),
            ..Default::default()
        };
        assert!(state.is_paid());
        assert_eq!(state.application_id(), Some("A1"));
        assert_eq!(state.loan_name(), Some("Home Loan"));

        let unpaid = CheckoutSessionState {
            payment_status: "unpaid".to_string(),
            ..Default::default()
        };
        assert!(!unpaid.is_paid());
        assert_eq!(unpaid.application_id(), None);
    }

    #[test]
    fn request_metadata_carries_application_and_title() {
        let request = CheckoutSessionRequest {
            application_id: "A1".to_string(),
            loan_title: "Home Loan".to_string(),
            unit_amount: 50_000,
            currency: "usd".to_string(),
            customer_email: "a@x.com".to_string(),
            success_url: "https://s".to_string(),
            cancel_url: "https://c".to_string(),
        };
        let metadata = request.metadata();
        assert_eq!(metadata["applicationId"], "A1");
        assert_eq!(metadata["loanName"], "Home Loan");
    }
}
