//! Loan listing repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LoanId};
use crate::domain::loan::Loan;

#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Insert a new loan listing.
    async fn save(&self, loan: &Loan) -> Result<(), DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError>;

    /// Featured loans (`showHome == "On"`), newest first, at most `limit`.
    async fn list_featured(&self, limit: usize) -> Result<Vec<Loan>, DomainError>;

    /// Every loan, newest first.
    async fn list_all(&self) -> Result<Vec<Loan>, DomainError>;
}
