//! Top-level HTTP router.
//!
//! Each endpoint module owns its state type; the module routers are
//! resolved with their state here and merged under one auth layer.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::handlers::CheckoutSettings;
use crate::config::ServerConfig;
use crate::ports::{
    ApplicationRepository, LoanRepository, PaymentLedger, PaymentProvider, SessionValidator,
    UserRepository,
};

use super::loan::{loan_routes, LoanAppState};
use super::loan_application::{application_routes, ApplicationAppState};
use super::middleware::{auth_middleware, AuthState};
use super::payment::{payment_routes, PaymentAppState};
use super::user::{user_routes, UserAppState};

/// Everything the API needs from the outside world.
#[derive(Clone)]
pub struct ApiDependencies {
    pub loans: Arc<dyn LoanRepository>,
    pub users: Arc<dyn UserRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub ledger: Arc<dyn PaymentLedger>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub checkout: CheckoutSettings,
}

/// Builds the API router without transport layers.
pub fn api_router(deps: ApiDependencies) -> Router {
    let auth_state: AuthState = deps.session_validator.clone();

    Router::new()
        .route("/health", get(health))
        .merge(loan_routes().with_state(LoanAppState {
            loans: deps.loans.clone(),
        }))
        .merge(user_routes().with_state(UserAppState {
            users: deps.users.clone(),
        }))
        .merge(application_routes().with_state(ApplicationAppState {
            applications: deps.applications.clone(),
        }))
        .merge(payment_routes().with_state(PaymentAppState {
            applications: deps.applications,
            ledger: deps.ledger,
            payment_provider: deps.payment_provider,
            checkout: deps.checkout,
        }))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
}

/// Wraps a router with tracing, a request timeout and CORS.
pub fn with_transport_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() && !config.is_production() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(origins)
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
