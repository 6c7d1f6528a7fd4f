//! Loan application aggregate.
//!
//! # Invariants
//!
//! - New applications start `Unpaid` with no transaction or tracking id
//! - Once `Paid`, `transaction_id` and `tracking_id` are set and never change
//! - Free-form applicant fields live in `details` and are opaque to the domain

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{ApplicationId, LoanId, Timestamp, ValidationError};
use crate::domain::payment::TrackingId;

use super::FeeStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    #[serde(rename = "_id")]
    pub id: ApplicationId,

    /// Applicant email; ownership key for listing.
    pub email: String,

    pub loan_id: Option<LoanId>,

    #[serde(default)]
    pub loan_title: String,

    #[serde(rename = "FeeStatus")]
    pub fee_status: FeeStatus,

    pub transaction_id: Option<String>,

    pub tracking_id: Option<TrackingId>,

    pub created_at: Timestamp,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Outcome of applying a confirmed payment to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaidTransition {
    /// Fee status moved to paid.
    Applied,
    /// Already paid; reconciliation fields left untouched.
    AlreadyPaid,
}

impl LoanApplication {
    /// Creates a new unpaid application.
    pub fn submit(
        email: impl Into<String>,
        loan_id: Option<LoanId>,
        loan_title: impl Into<String>,
        details: Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @"));
        }

        Ok(Self {
            id: ApplicationId::new(),
            email,
            loan_id,
            loan_title: loan_title.into(),
            fee_status: FeeStatus::Unpaid,
            transaction_id: None,
            tracking_id: None,
            created_at: Timestamp::now(),
            details,
        })
    }

    pub fn is_paid(&self) -> bool {
        self.fee_status == FeeStatus::Paid
    }

    /// Marks the processing fee as paid by `transaction_id`.
    ///
    /// The first confirmed transaction wins; later ones leave the
    /// application as it is.
    pub fn mark_paid(&mut self, transaction_id: &str, tracking_id: &TrackingId) -> PaidTransition {
        if self.is_paid() {
            return PaidTransition::AlreadyPaid;
        }

        self.fee_status = FeeStatus::Paid;
        self.transaction_id = Some(transaction_id.to_string());
        self.tracking_id = Some(tracking_id.clone());
        PaidTransition::Applied
    }
}
