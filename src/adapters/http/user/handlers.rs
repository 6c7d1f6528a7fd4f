//! HTTP handlers for user accounts.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::responses::{InsertedResponse, MessageResponse};
use crate::application::handlers::{
    GetUserRoleHandler, ListUsersHandler, RegisterUserHandler, RegisterUserResult,
    UpdateUserStatusCommand, UpdateUserStatusHandler,
};
use crate::ports::UserRepository;

use super::dto::{RegisterUserRequest, RoleResponse, UpdateStatusRequest};

#[derive(Clone)]
pub struct UserAppState {
    pub users: Arc<dyn UserRepository>,
}

/// POST /users
///
/// An already-registered email answers 200 with a message instead of an id.
pub async fn register_user(
    State(state): State<UserAppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Response, ApiError> {
    let result = RegisterUserHandler::new(state.users.clone())
        .handle(request.into())
        .await?;

    Ok(match result {
        RegisterUserResult::Created(id) => {
            (StatusCode::CREATED, Json(InsertedResponse::new(id))).into_response()
        }
        RegisterUserResult::AlreadyExists => {
            Json(MessageResponse::new("borrower exists")).into_response()
        }
    })
}

/// GET /users
pub async fn list_users(State(state): State<UserAppState>) -> Result<impl IntoResponse, ApiError> {
    let users = ListUsersHandler::new(state.users.clone()).handle().await?;
    Ok(Json(users))
}

/// PATCH /users/:id
pub async fn update_user_status(
    State(state): State<UserAppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(actor = %user.id, target = %user_id, "Updating user status");

    let count = UpdateUserStatusHandler::new(state.users.clone())
        .handle(UpdateUserStatusCommand {
            user_id,
            status: request.status,
        })
        .await?;

    Ok(Json(count))
}

/// GET /users/role/:email
pub async fn user_role(
    State(state): State<UserAppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let role = GetUserRoleHandler::new(state.users.clone())
        .handle(&email)
        .await?;

    Ok(Json(RoleResponse { role }))
}
