//! Loan application repository port.
//!
//! Fee-status changes do not go through this port; they are written by
//! [`PaymentLedger::record_confirmation`](super::PaymentLedger) together
//! with the payment row.

use async_trait::async_trait;

use crate::domain::application::LoanApplication;
use crate::domain::foundation::{ApplicationId, DomainError};

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert a new application.
    async fn save(&self, application: &LoanApplication) -> Result<(), DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ApplicationId)
        -> Result<Option<LoanApplication>, DomainError>;

    /// Applications newest first, optionally restricted to one applicant email.
    async fn list(&self, email: Option<&str>) -> Result<Vec<LoanApplication>, DomainError>;

    /// Delete by id; returns the number of rows removed.
    async fn delete(&self, id: &ApplicationId) -> Result<u64, DomainError>;
}
