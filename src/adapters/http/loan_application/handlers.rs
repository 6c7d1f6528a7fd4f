//! HTTP handlers for loan applications.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::responses::{DeletedResponse, InsertedResponse};
use crate::application::handlers::{
    DeleteApplicationHandler, GetApplicationHandler, ListApplicationsHandler,
    ListApplicationsQuery, SubmitApplicationHandler,
};
use crate::ports::ApplicationRepository;

use super::dto::{ListApplicationsParams, SubmitApplicationRequest};

#[derive(Clone)]
pub struct ApplicationAppState {
    pub applications: Arc<dyn ApplicationRepository>,
}

/// POST /loanApplications
pub async fn submit_application(
    State(state): State<ApplicationAppState>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SubmitApplicationHandler::new(state.applications.clone())
        .handle(request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(InsertedResponse::new(id))))
}

/// GET /loanApplications?email=...
///
/// Requires a bearer token; an `email` filter must match the token's email.
pub async fn list_applications(
    State(state): State<ApplicationAppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListApplicationsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let applications = ListApplicationsHandler::new(state.applications.clone())
        .handle(ListApplicationsQuery {
            requester: user,
            email: params.email,
        })
        .await?;

    Ok(Json(applications))
}

/// GET /loanApplications/:id
pub async fn get_application(
    State(state): State<ApplicationAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let application = GetApplicationHandler::new(state.applications.clone())
        .handle(&id)
        .await?;

    Ok(Json(application))
}

/// DELETE /loanApplications/:id
pub async fn delete_application(
    State(state): State<ApplicationAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted_count = DeleteApplicationHandler::new(state.applications.clone())
        .handle(&id)
        .await?;

    Ok(Json(DeletedResponse { deleted_count }))
}
