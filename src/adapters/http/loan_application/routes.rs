use axum::{routing::get, Router};

use super::handlers::{
    delete_application, get_application, list_applications, submit_application,
    ApplicationAppState,
};

/// # Routes
///
/// - `GET /loanApplications` - requires a bearer token
/// - `POST /loanApplications`
/// - `GET /loanApplications/:id`, `DELETE /loanApplications/:id`
pub fn application_routes() -> Router<ApplicationAppState> {
    Router::new()
        .route(
            "/loanApplications",
            get(list_applications).post(submit_application),
        )
        .route(
            "/loanApplications/:id",
            get(get_application).delete(delete_application),
        )
}
