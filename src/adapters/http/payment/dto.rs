//! Request and response types for the payment endpoints.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::handlers::{
    ConfirmPaymentResult, CreateCheckoutSessionCommand, CreateCheckoutSessionResult,
};
use crate::ports::UpdateCount;

use crate::adapters::http::responses::InsertedResponse;

/// Body of `POST /payment-checkout-session`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub application_id: String,
    pub loan_title: String,
    /// Fee in major units; clients send either a number or a numeric string.
    #[serde(deserialize_with = "deserialize_cost")]
    pub cost: Decimal,
    pub user_email: String,
}

impl From<CreateCheckoutSessionRequest> for CreateCheckoutSessionCommand {
    fn from(request: CreateCheckoutSessionRequest) -> Self {
        Self {
            application_id: request.application_id,
            loan_title: request.loan_title,
            cost: request.cost,
            user_email: request.user_email,
        }
    }
}

fn deserialize_cost<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| D::Error::custom(format!("invalid cost: {}", e))),
        Value::String(s) => Decimal::from_str(s.trim())
            .map_err(|e| D::Error::custom(format!("invalid cost '{}': {}", s, e))),
        other => Err(D::Error::custom(format!(
            "cost must be a number or numeric string, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub url: String,
    pub session_id: String,
}

impl From<CreateCheckoutSessionResult> for CheckoutSessionResponse {
    fn from(result: CreateCheckoutSessionResult) -> Self {
        Self {
            url: result.url,
            session_id: result.session_id,
        }
    }
}

/// Query of `PATCH /payment-success`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentQuery {
    #[serde(default)]
    pub session_id: String,
}

/// Body of `PATCH /payment-success`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modify_application: Option<UpdateCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<InsertedResponse>,
}

impl From<ConfirmPaymentResult> for ConfirmPaymentResponse {
    fn from(result: ConfirmPaymentResult) -> Self {
        match result {
            ConfirmPaymentResult::Confirmed {
                transaction_id,
                tracking_id,
                application_update,
                payment_id,
            } => Self {
                success: true,
                message: None,
                transaction_id: Some(transaction_id),
                tracking_id: Some(tracking_id.to_string()),
                modify_application: Some(application_update),
                payment_info: Some(InsertedResponse::new(payment_id)),
            },
            ConfirmPaymentResult::AlreadyProcessed {
                transaction_id,
                tracking_id,
            } => Self {
                success: true,
                message: Some("already exists".to_string()),
                transaction_id: Some(transaction_id),
                tracking_id: Some(tracking_id.to_string()),
                modify_application: None,
                payment_info: None,
            },
            ConfirmPaymentResult::NotPaid { payment_status } => Self {
                success: false,
                message: Some(format!("payment not completed ({})", payment_status)),
                transaction_id: None,
                tracking_id: None,
                modify_application: None,
                payment_info: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentId;
    use crate::domain::payment::TrackingId;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn parse(body: Value) -> Result<CreateCheckoutSessionRequest, serde_json::Error> {
        serde_json::from_value(body)
    }

    #[test]
    fn cost_accepts_number_and_string() {
        let base = |cost: Value| {
            json!({
                "applicationId": "A1",
                "loanTitle": "Home Loan",
                "cost": cost,
                "userEmail": "a@x.com"
            })
        };

        assert_eq!(parse(base(json!(500))).unwrap().cost, dec!(500));
        assert_eq!(parse(base(json!(12.5))).unwrap().cost, dec!(12.5));
        assert_eq!(parse(base(json!(" 500 "))).unwrap().cost, dec!(500));
        assert!(parse(base(json!("five hundred"))).is_err());
        assert!(parse(base(json!(null))).is_err());
    }

    #[test]
    fn confirmed_response_shape() {
        let tracking: TrackingId = "PRCL-20240101-ABCDEF".parse().unwrap();
        let response = ConfirmPaymentResponse::from(ConfirmPaymentResult::Confirmed {
            transaction_id: "pi_123".to_string(),
            tracking_id: tracking,
            application_update: UpdateCount::new(1, 1),
            payment_id: PaymentId::parse("P1").unwrap(),
        });

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "success": true,
                "transactionId": "pi_123",
                "trackingId": "PRCL-20240101-ABCDEF",
                "modifyApplication": {"matchedCount": 1, "modifiedCount": 1},
                "paymentInfo": {"insertedId": "P1"}
            })
        );
    }

    #[test]
    fn already_processed_response_shape() {
        let tracking: TrackingId = "PRCL-20240101-ABCDEF".parse().unwrap();
        let response = ConfirmPaymentResponse::from(ConfirmPaymentResult::AlreadyProcessed {
            transaction_id: "pi_123".to_string(),
            tracking_id: tracking,
        });

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "success": true,
                "message": "already exists",
                "transactionId": "pi_123",
                "trackingId": "PRCL-20240101-ABCDEF"
            })
        );
    }

    #[test]
    fn not_paid_is_unsuccessful() {
        let response = ConfirmPaymentResponse::from(ConfirmPaymentResult::NotPaid {
            payment_status: "unpaid".to_string(),
        });
        assert!(!response.success);
        assert!(response.tracking_id.is_none());
    }
}
