//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` - validates a Bearer token and injects the user into extensions
//! - `RequireAuth` - extractor that rejects requests without a verified user
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! let validator: Arc<dyn SessionValidator> = Arc::new(MockSessionValidator::new());
//!
//! let app = Router::new()
//!     .route("/loanApplications", get(list_applications))
//!     .layer(middleware::from_fn_with_state(validator, auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";

/// Validates `Authorization: Bearer <token>` when present.
///
/// A request without the header passes through untouched; routes that need
/// a user enforce it with `RequireAuth`. A header that fails validation is
/// rejected here with 401 (or 503 if the key set could not be fetched).
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(header_value) = request.headers().get(header::AUTHORIZATION) else {
        return next.run(request).await;
    };

    let token = header_value
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return AuthRejection::Unauthenticated.into_response();
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(AuthError::ServiceUnavailable(msg)) => {
            tracing::error!("Auth service unavailable: {}", msg);
            AuthRejection::ServiceUnavailable.into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            AuthRejection::Unauthenticated.into_response()
        }
    }
}

/// Extractor that requires a verified user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No token, or a token that failed validation.
    Unauthenticated,
    /// The identity provider's keys could not be fetched.
    ServiceUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", UNAUTHORIZED_MESSAGE),
            ),
            AuthRejection::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse {
                    retryable: Some(true),
                    ..ErrorResponse::new(
                        "EXTERNAL_SERVICE_ERROR",
                        "authentication service unavailable",
                    )
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
