use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers::{list_users, register_user, update_user_status, user_role, UserAppState};

/// # Routes
///
/// - `POST /users`, `GET /users`
/// - `PATCH /users/:id` - requires a bearer token
/// - `GET /users/role/:email`
pub fn user_routes() -> Router<UserAppState> {
    Router::new()
        .route("/users", get(list_users).post(register_user))
        .route("/users/:id", patch(update_user_status))
        .route("/users/role/:email", get(user_role))
}
