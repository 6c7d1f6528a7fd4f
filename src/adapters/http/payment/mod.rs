//! HTTP adapter for processing-fee payments.
//!
//! - `POST /payment-checkout-session` - Create a Stripe Checkout session
//! - `PATCH /payment-success` - Confirm a session and mark the application paid

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::PaymentAppState;
pub use routes::payment_routes;
