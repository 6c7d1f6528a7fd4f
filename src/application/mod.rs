//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Payment handlers carry the reconciliation logic; the rest are thin
//! command/query handlers over the repositories.

pub mod handlers;

pub use handlers::{
    CheckoutSettings, ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult,
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
};
