//! HTTP adapter for the loan catalogue.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::LoanAppState;
pub use routes::loan_routes;
