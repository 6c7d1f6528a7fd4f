//! Payment ledger entry.
//!
//! # Invariants
//!
//! - At most one `Payment` exists per `transaction_id`
//! - Entries are written once and never updated or deleted
//! - `amount` is in major units and equals the processor's `amount_total / 100`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    from_minor_units, ApplicationId, PaymentId, Timestamp, ValidationError,
};

use super::TrackingId;

/// Settled checkout as reported by the payment processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaidCheckout {
    pub application_id: ApplicationId,
    pub transaction_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub loan_name: Option<String>,
    pub payment_status: String,
}

/// Recorded processing-fee payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: PaymentId,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub currency: String,

    pub customer_email: Option<String>,

    pub application_id: ApplicationId,

    pub loan_name: Option<String>,

    /// Processor payment-intent id; the idempotence key.
    pub transaction_id: String,

    pub payment_status: String,

    pub paid_at: Timestamp,

    pub tracking_id: TrackingId,
}

impl Payment {
    /// Builds the ledger entry for a settled checkout.
    pub fn confirmed(
        checkout: PaidCheckout,
        tracking_id: TrackingId,
        paid_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if checkout.transaction_id.trim().is_empty() {
            return Err(ValidationError::empty_field("transactionId"));
        }
        if checkout.currency.trim().is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if checkout.amount_minor <= 0 {
            return Err(ValidationError::not_positive(
                "amountTotal",
                checkout.amount_minor,
            ));
        }

        Ok(Self {
            id: PaymentId::new(),
            amount: from_minor_units(checkout.amount_minor),
            currency: checkout.currency.to_lowercase(),
            customer_email: checkout.customer_email,
            application_id: checkout.application_id,
            loan_name: checkout.loan_name,
            transaction_id: checkout.transaction_id,
            payment_status: checkout.payment_status,
            paid_at,
            tracking_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn checkout() -> PaidCheckout {
        PaidCheckout {
            application_id: ApplicationId::parse("A1").unwrap(),
            transaction_id: "pi_123".to_string(),
            amount_minor: 50_000,
            currency: "USD".to_string(),
            customer_email: Some("a@x.com".to_string()),
            loan_name: Some("Home Loan".to_string()),
            payment_status: "paid".to_string(),
        }
    }

    fn tracking() -> TrackingId {
        "PRCL-20240101-ABCDEF".parse().unwrap()
    }

    #[test]
    fn confirmed_converts_minor_units() {
        let payment = Payment::confirmed(checkout(), tracking(), Timestamp::now()).unwrap();
        assert_eq!(payment.amount, dec!(500));
        assert_eq!(payment.currency, "usd");
        assert_eq!(payment.transaction_id, "pi_123");
        assert_eq!(payment.tracking_id, tracking());
    }

    #[test]
    fn confirmed_requires_transaction_id() {
        let mut checkout = checkout();
        checkout.transaction_id = " ".to_string();
        assert!(Payment::confirmed(checkout, tracking(), Timestamp::now()).is_err());
    }

    #[test]
    fn confirmed_requires_positive_amount_and_currency() {
        let mut zero = checkout();
        zero.amount_minor = 0;
        assert!(Payment::confirmed(zero, tracking(), Timestamp::now()).is_err());

        let mut no_currency = checkout();
        no_currency.currency = String::new();
        assert!(Payment::confirmed(no_currency, tracking(), Timestamp::now()).is_err());
    }

    #[test]
    fn serializes_with_client_field_names() {
        let payment = Payment::confirmed(checkout(), tracking(), Timestamp::now()).unwrap();
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["amount"], serde_json::json!(500.0));
        assert_eq!(json["transactionId"], "pi_123");
        assert_eq!(json["trackingId"], "PRCL-20240101-ABCDEF");
        assert_eq!(json["applicationId"], "A1");
        assert!(json.get("_id").is_some());
    }
}
