//! HTTP handlers for the processing-fee payment endpoints.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::application::handlers::{
    CheckoutSettings, ConfirmPaymentCommand, ConfirmPaymentHandler, CreateCheckoutSessionHandler,
};
use crate::ports::{ApplicationRepository, PaymentLedger, PaymentProvider};

use super::dto::{
    CheckoutSessionResponse, ConfirmPaymentQuery, ConfirmPaymentResponse,
    CreateCheckoutSessionRequest,
};

/// Dependencies of the payment endpoints.
#[derive(Clone)]
pub struct PaymentAppState {
    pub applications: Arc<dyn ApplicationRepository>,
    pub ledger: Arc<dyn PaymentLedger>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub checkout: CheckoutSettings,
}

impl PaymentAppState {
    pub fn create_checkout_session_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.applications.clone(),
            self.payment_provider.clone(),
            self.checkout.clone(),
        )
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(self.payment_provider.clone(), self.ledger.clone())
    }
}

/// POST /payment-checkout-session
pub async fn create_checkout_session(
    State(state): State<PaymentAppState>,
    Json(request): Json<CreateCheckoutSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_checkout_session_handler()
        .handle(request.into())
        .await?;

    Ok(Json(CheckoutSessionResponse::from(result)))
}

/// PATCH /payment-success?session_id=...
pub async fn confirm_payment(
    State(state): State<PaymentAppState>,
    Query(query): Query<ConfirmPaymentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .confirm_payment_handler()
        .handle(ConfirmPaymentCommand {
            session_id: query.session_id,
        })
        .await?;

    Ok(Json(ConfirmPaymentResponse::from(result)))
}
