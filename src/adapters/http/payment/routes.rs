//! Axum router configuration for the payment endpoints.

use axum::{
    routing::{patch, post},
    Router,
};

use super::handlers::{confirm_payment, create_checkout_session, PaymentAppState};

/// # Routes
///
/// - `POST /payment-checkout-session` - Start hosted checkout for an application fee
/// - `PATCH /payment-success` - Reconcile a returned checkout session
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/payment-checkout-session", post(create_checkout_session))
        .route("/payment-success", patch(confirm_payment))
}
