//! Shared harness for the HTTP integration tests.
//!
//! Builds the full router over the in-memory store, the mock payment
//! provider and the mock token validator, and drives it with `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use loan_desk::adapters::auth::MockSessionValidator;
use loan_desk::adapters::http::{api_router, ApiDependencies};
use loan_desk::adapters::memory::InMemoryStore;
use loan_desk::adapters::stripe::MockPaymentProvider;
use loan_desk::application::handlers::CheckoutSettings;

pub const BORROWER_TOKEN: &str = "token-borrower";
pub const BORROWER_EMAIL: &str = "a@x.com";
pub const OTHER_TOKEN: &str = "token-other";
pub const OTHER_EMAIL: &str = "b@x.com";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub provider: MockPaymentProvider,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let provider = MockPaymentProvider::new();
        let validator = MockSessionValidator::new()
            .with_test_user(BORROWER_TOKEN, BORROWER_EMAIL)
            .with_test_user(OTHER_TOKEN, OTHER_EMAIL);

        let router = api_router(ApiDependencies {
            loans: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            applications: Arc::new(store.clone()),
            ledger: Arc::new(store.clone()),
            payment_provider: Arc::new(provider.clone()),
            session_validator: Arc::new(validator),
            checkout: CheckoutSettings::new("https://desk.test", "usd"),
        });

        Self {
            router,
            store,
            provider,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    /// Submits an application and returns its id.
    pub async fn submit_application(&self, email: &str, loan_title: &str) -> String {
        let (status, body) = self
            .post(
                "/loanApplications",
                serde_json::json!({ "email": email, "loanTitle": loan_title }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["insertedId"].as_str().unwrap().to_string()
    }
}
