//! In-memory store implementing every storage port.
//!
//! Useful for tests and local development. All tables sit behind one
//! `tokio::sync::RwLock`, so a confirmation's check-insert-update runs under
//! a single write guard and concurrent confirmations of one transaction
//! cannot both insert.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::application::{LoanApplication, PaidTransition};
use crate::domain::foundation::{
    AccountId, ApplicationId, DomainError, ErrorCode, LoanId, Timestamp,
};
use crate::domain::loan::Loan;
use crate::domain::payment::Payment;
use crate::domain::user::User;
use crate::ports::{
    ApplicationRepository, LoanRepository, PaymentLedger, RecordOutcome, SaveResult,
    UpdateCount, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    loans: HashMap<LoanId, Loan>,
    users: HashMap<AccountId, User>,
    applications: HashMap<ApplicationId, LoanApplication>,
    /// Keyed by transaction id.
    payments: HashMap<String, Payment>,
}

/// Process-local store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded payments.
    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }

    /// Every recorded payment, in no particular order.
    pub async fn payments(&self) -> Vec<Payment> {
        self.tables.read().await.payments.values().cloned().collect()
    }
}

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> Timestamp) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl LoanRepository for InMemoryStore {
    async fn save(&self, loan: &Loan) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .loans
            .insert(loan.id.clone(), loan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        Ok(self.tables.read().await.loans.get(id).cloned())
    }

    async fn list_featured(&self, limit: usize) -> Result<Vec<Loan>, DomainError> {
        let featured: Vec<Loan> = self
            .tables
            .read()
            .await
            .loans
            .values()
            .filter(|loan| loan.is_featured())
            .cloned()
            .collect();
        let mut featured = newest_first(featured, |loan: &Loan| loan.created_at);
        featured.truncate(limit);
        Ok(featured)
    }

    async fn list_all(&self) -> Result<Vec<Loan>, DomainError> {
        let loans: Vec<Loan> = self.tables.read().await.loans.values().cloned().collect();
        Ok(newest_first(loans, |loan: &Loan| loan.created_at))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_if_absent(&self, user: &User) -> Result<SaveResult, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Ok(SaveResult::AlreadyExists);
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(SaveResult::Inserted)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        let users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |user: &User| user.created_at))
    }

    async fn update_status(
        &self,
        id: &AccountId,
        status: &str,
    ) -> Result<UpdateCount, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(id) else {
            return Ok(UpdateCount::none());
        };
        if user.status.as_deref() == Some(status) {
            return Ok(UpdateCount::new(1, 0));
        }
        user.status = Some(status.to_string());
        Ok(UpdateCount::new(1, 1))
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn save(&self, application: &LoanApplication) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, DomainError> {
        Ok(self.tables.read().await.applications.get(id).cloned())
    }

    async fn list(&self, email: Option<&str>) -> Result<Vec<LoanApplication>, DomainError> {
        let email = email.map(str::trim);
        let applications: Vec<LoanApplication> = self
            .tables
            .read()
            .await
            .applications
            .values()
            .filter(|app| email.map_or(true, |e| app.email.eq_ignore_ascii_case(e)))
            .cloned()
            .collect();
        Ok(newest_first(applications, |app: &LoanApplication| {
            app.created_at
        }))
    }

    async fn delete(&self, id: &ApplicationId) -> Result<u64, DomainError> {
        let removed = self.tables.write().await.applications.remove(id);
        Ok(u64::from(removed.is_some()))
    }
}

#[async_trait]
impl PaymentLedger for InMemoryStore {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self.tables.read().await.payments.get(transaction_id).cloned())
    }

    async fn record_confirmation(&self, payment: &Payment) -> Result<RecordOutcome, DomainError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.payments.get(&payment.transaction_id) {
            return Ok(RecordOutcome::AlreadyRecorded(existing.clone()));
        }

        let Some(application) = tables.applications.get_mut(&payment.application_id) else {
            return Err(DomainError::new(
                ErrorCode::ApplicationNotFound,
                format!("Application {} not found", payment.application_id),
            )
            .with_detail("id", payment.application_id.as_str()));
        };

        let update = match application.mark_paid(&payment.transaction_id, &payment.tracking_id) {
            PaidTransition::Applied => UpdateCount::new(1, 1),
            PaidTransition::AlreadyPaid => UpdateCount::new(1, 0),
        };

        tables
            .payments
            .insert(payment.transaction_id.clone(), payment.clone());

        Ok(RecordOutcome::Recorded {
            application: update,
        })
    }
}
