//! HTTP adapter for loan applications.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ApplicationAppState;
pub use routes::application_routes;
