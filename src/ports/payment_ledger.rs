//! Payment ledger port.
//!
//! The ledger is the only writer of both `payments` rows and the
//! reconciliation fields of loan applications. A confirmation is a single
//! atomic unit: either the payment row and the application update both
//! persist, or neither does.
//!
//! ## Concurrency
//!
//! Two confirmations for the same transaction id may race. Implementations
//! must guarantee that exactly one of them records the payment; the other
//! observes `AlreadyRecorded` with the winner's row.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::Payment;

use super::UpdateCount;

/// Outcome of [`PaymentLedger::record_confirmation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Payment inserted and the application marked paid.
    Recorded { application: UpdateCount },

    /// A payment with this transaction id already existed. Nothing written.
    AlreadyRecorded(Payment),
}

#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Look up the payment recorded for a processor transaction id.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError>;

    /// Atomically insert `payment` and mark its application paid with the
    /// payment's transaction and tracking ids.
    ///
    /// # Errors
    ///
    /// - `ApplicationNotFound` if the application does not exist (nothing
    ///   is written)
    /// - `DatabaseError` on persistence failure
    async fn record_confirmation(&self, payment: &Payment) -> Result<RecordOutcome, DomainError>;
}
