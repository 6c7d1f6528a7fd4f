//! Processing-fee payment handlers.

mod confirm_payment;
mod create_checkout_session;

pub use confirm_payment::{ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult};
pub use create_checkout_session::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult,
};
