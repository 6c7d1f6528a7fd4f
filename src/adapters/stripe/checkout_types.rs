//! Stripe REST objects used by the checkout adapter.
//!
//! Only the fields this service reads are modelled; Stripe sends many more.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ports::CheckoutSessionState;

/// Stripe Checkout Session object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted payment page; null once the session is complete or expired.
    pub url: Option<String>,

    /// Payment intent id (pi_...), present once payment was submitted.
    pub payment_intent: Option<String>,

    /// `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,

    /// `open`, `complete` or `expired`.
    pub status: Option<String>,

    /// Total in minor units.
    pub amount_total: Option<i64>,

    pub currency: Option<String>,

    /// Email passed at creation.
    pub customer_email: Option<String>,

    /// Details the payer entered on the hosted page.
    pub customer_details: Option<StripeCustomerDetails>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCustomerDetails {
    pub email: Option<String>,
}

impl From<StripeCheckoutSession> for CheckoutSessionState {
    fn from(session: StripeCheckoutSession) -> Self {
        let customer_email = session
            .customer_email
            .or_else(|| session.customer_details.and_then(|details| details.email));

        CheckoutSessionState {
            id: session.id,
            payment_intent: session.payment_intent,
            payment_status: session.payment_status,
            amount_total: session.amount_total,
            currency: session.currency,
            customer_email,
            metadata: session.metadata,
        }
    }
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}
