//! HTTP adapters - REST API implementations.
//!
//! Each resource has its own module with dto, handlers and routes.

pub mod error;
pub mod loan;
pub mod loan_application;
pub mod middleware;
pub mod payment;
pub mod responses;
pub mod router;
pub mod user;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_router, with_transport_layers, ApiDependencies};
