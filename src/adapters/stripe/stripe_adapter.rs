//! Stripe Checkout adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API:
//! form-encoded requests, basic auth with the secret key, JSON responses.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key).with_timeout(Duration::from_secs(20));
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::PaymentConfig;
use crate::ports::{
    CheckoutSession, CheckoutSessionRequest, CheckoutSessionState, PaymentError,
    PaymentErrorCode, PaymentProvider, METADATA_APPLICATION_ID, METADATA_LOAN_NAME,
};

use super::checkout_types::{StripeCheckoutSession, StripeErrorBody};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self::new(config.stripe_api_key.clone())
            .with_base_url(config.stripe_api_base_url.clone())
            .with_timeout(config.http_timeout())
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Stripe payment provider adapter.
#[derive(Debug)]
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Form body for `POST /v1/checkout/sessions`.
    fn checkout_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
        vec![
            ("mode".into(), "payment".into()),
            (
                "line_items[0][price_data][currency]".into(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                request.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                request.loan_title.clone(),
            ),
            ("line_items[0][quantity]".into(), "1".into()),
            ("customer_email".into(), request.customer_email.clone()),
            (
                format!("metadata[{}]", METADATA_APPLICATION_ID),
                request.application_id.clone(),
            ),
            (
                format!("metadata[{}]", METADATA_LOAN_NAME),
                request.loan_title.clone(),
            ),
            ("success_url".into(), request.success_url.clone()),
            ("cancel_url".into(), request.cancel_url.clone()),
        ]
    }

    /// Map a non-success response into a classified `PaymentError`.
    async fn error_from_response(response: reqwest::Response) -> PaymentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let parsed = serde_json::from_str::<StripeErrorBody>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.error.message.clone())
            .unwrap_or_else(|| format!("Stripe API error ({})", status));

        let mut error = PaymentError::from_status(status.as_u16(), message);
        if let Some(code) = parsed.and_then(|b| b.error.code) {
            error = error.with_provider_code(code);
        }

        if error.retryable {
            tracing::warn!(status = status.as_u16(), error = %error, "Stripe request failed (retryable)");
        } else {
            tracing::error!(status = status.as_u16(), error = %error, "Stripe request failed");
        }
        error
    }
}

/// Stripe object ids are `[A-Za-z0-9_]+`.
fn is_valid_object_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = Self::checkout_form(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let Some(redirect) = session.url else {
            return Err(PaymentError::provider(format!(
                "Checkout session {} has no url",
                session.id
            )));
        };

        tracing::info!(
            session_id = %session.id,
            application_id = %request.application_id,
            unit_amount = request.unit_amount,
            "Created Stripe checkout session"
        );

        Ok(CheckoutSession {
            id: session.id,
            url: redirect,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSessionState, PaymentError> {
        if !is_valid_object_id(session_id) {
            return Err(PaymentError::new(
                PaymentErrorCode::InvalidRequest,
                format!("Malformed checkout session id: {:?}", session_id),
            ));
        }

        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, session_id
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::not_found(session_id));
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(session.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Form, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn request() -> CheckoutSessionRequest {
        CheckoutSessionRequest {
            application_id: "A1".to_string(),
            loan_title: "Home Loan".to_string(),
            unit_amount: 50_000,
            currency: "usd".to_string(),
            customer_email: "a@x.com".to_string(),
            success_url: "https://loans.example.com/dashboard/payment-success?session_id={CHECKOUT_SESSION_ID}".to_string(),
            cancel_url: "https://loans.example.com/dashboard/payment-cancelled".to_string(),
        }
    }

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn adapter(base_url: String) -> StripePaymentAdapter {
        StripePaymentAdapter::new(StripeConfig::new("sk_test_key").with_base_url(base_url))
            .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_defaults() {
        let config = StripeConfig::new("sk_test_key");
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn config_with_base_url_trims_slash() {
        let config = StripeConfig::new("key").with_base_url("http://localhost:12111/");
        assert_eq!(config.api_base_url, "http://localhost:12111");
    }

    #[test]
    fn debug_does_not_leak_key() {
        let config = StripeConfig::new("sk_test_secret_value");
        assert!(!format!("{:?}", config).contains("sk_test_secret_value"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Request shaping
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn checkout_form_has_single_priced_line_item() {
        let form: HashMap<String, String> =
            StripePaymentAdapter::checkout_form(&request()).into_iter().collect();

        assert_eq!(form["mode"], "payment");
        assert_eq!(form["line_items[0][price_data][unit_amount]"], "50000");
        assert_eq!(form["line_items[0][price_data][currency]"], "usd");
        assert_eq!(form["line_items[0][price_data][product_data][name]"], "Home Loan");
        assert_eq!(form["line_items[0][quantity]"], "1");
        assert_eq!(form["metadata[applicationId]"], "A1");
        assert_eq!(form["metadata[loanName]"], "Home Loan");
        assert_eq!(form["customer_email"], "a@x.com");
    }

    #[test]
    fn object_id_validation() {
        assert!(is_valid_object_id("cs_test_a1B2"));
        assert!(!is_valid_object_id(""));
        assert!(!is_valid_object_id("../v1/customers"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Round trips against a local stand-in
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_checkout_session_posts_form_and_returns_url() {
        let router = Router::new().route(
            "/v1/checkout/sessions",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                assert_eq!(form["line_items[0][price_data][unit_amount]"], "50000");
                Json(json!({
                    "id": "cs_test_1",
                    "url": "https://checkout.stripe.com/c/pay/cs_test_1",
                    "payment_intent": null,
                    "payment_status": "unpaid",
                    "metadata": {"applicationId": form["metadata[applicationId]"]}
                }))
            }),
        );
        let adapter = adapter(serve(router).await);

        let session = adapter.create_checkout_session(request()).await.unwrap();

        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_1");
    }

    #[tokio::test]
    async fn retrieve_maps_session_fields() {
        let router = Router::new().route(
            "/v1/checkout/sessions/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "id": id,
                    "url": null,
                    "payment_intent": "pi_123",
                    "payment_status": "paid",
                    "amount_total": 50000,
                    "currency": "usd",
                    "customer_email": "a@x.com",
                    "metadata": {"applicationId": "A1", "loanName": "Home Loan"}
                }))
            }),
        );
        let adapter = adapter(serve(router).await);

        let state = adapter.retrieve_checkout_session("cs_test_1").await.unwrap();

        assert_eq!(state.id, "cs_test_1");
        assert!(state.is_paid());
        assert_eq!(state.payment_intent.as_deref(), Some("pi_123"));
        assert_eq!(state.amount_total, Some(50_000));
    }

    #[tokio::test]
    async fn retrieve_unknown_session_is_not_found() {
        let router = Router::new().route(
            "/v1/checkout/sessions/:id",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": {"code": "resource_missing", "message": "No such checkout.session"}})),
                )
            }),
        );
        let adapter = adapter(serve(router).await);

        let err = adapter.retrieve_checkout_session("cs_missing").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::NotFound);
        assert!(!err.retryable);
    }

    #[tokio::test]
    async fn server_errors_are_retryable() {
        let router = Router::new().route(
            "/v1/checkout/sessions/:id",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(Value::Null)) }),
        );
        let adapter = adapter(serve(router).await);

        let err = adapter.retrieve_checkout_session("cs_test_1").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::ProviderUnavailable);
        assert!(err.retryable);
    }

    #[tokio::test]
    async fn unreachable_processor_is_retryable_network_error() {
        let adapter = adapter("http://127.0.0.1:9".to_string());

        let err = adapter.retrieve_checkout_session("cs_test_1").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::NetworkError);
        assert!(err.retryable);
    }

    #[tokio::test]
    async fn malformed_session_id_never_leaves_the_process() {
        let adapter = adapter("http://127.0.0.1:9".to_string());

        let err = adapter.retrieve_checkout_session("../v1/balance").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
    }
}
