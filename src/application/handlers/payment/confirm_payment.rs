//! ConfirmPaymentHandler - Reconciles a returned checkout session with the store.
//!
//! Safe to call any number of times for the same session: the payment
//! ledger's transaction-id uniqueness makes the first confirmation the only
//! one that writes, and every later call reports the stored tracking id.

use std::sync::Arc;

use crate::domain::foundation::{ApplicationId, PaymentId, Timestamp, ValidationError};
use crate::domain::payment::{PaidCheckout, Payment, TrackingId};
use crate::domain::LendingError;
use crate::ports::{PaymentLedger, PaymentProvider, RecordOutcome, UpdateCount};

#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPaymentResult {
    /// This call recorded the payment.
    Confirmed {
        transaction_id: String,
        tracking_id: TrackingId,
        application_update: UpdateCount,
        payment_id: PaymentId,
    },

    /// The transaction was reconciled earlier (or concurrently).
    AlreadyProcessed {
        transaction_id: String,
        tracking_id: TrackingId,
    },

    /// The processor does not report the session as paid. Nothing written.
    NotPaid { payment_status: String },
}

impl ConfirmPaymentResult {
    pub fn tracking_id(&self) -> Option<&TrackingId> {
        match self {
            ConfirmPaymentResult::Confirmed { tracking_id, .. }
            | ConfirmPaymentResult::AlreadyProcessed { tracking_id, .. } => Some(tracking_id),
            ConfirmPaymentResult::NotPaid { .. } => None,
        }
    }
}

pub struct ConfirmPaymentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    ledger: Arc<dyn PaymentLedger>,
}

impl ConfirmPaymentHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, ledger: Arc<dyn PaymentLedger>) -> Self {
        Self {
            payment_provider,
            ledger,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<ConfirmPaymentResult, LendingError> {
        let session_id = cmd.session_id.trim();
        if session_id.is_empty() {
            return Err(ValidationError::empty_field("session_id").into());
        }

        // 1. Current state according to the processor
        let session = self
            .payment_provider
            .retrieve_checkout_session(session_id)
            .await?;

        // 2. Reconciled before?
        if let Some(transaction_id) = session.payment_intent.as_deref() {
            if let Some(existing) = self.ledger.find_by_transaction_id(transaction_id).await? {
                tracing::debug!(session_id, transaction_id, "Payment already reconciled");
                return Ok(ConfirmPaymentResult::AlreadyProcessed {
                    transaction_id: existing.transaction_id,
                    tracking_id: existing.tracking_id,
                });
            }
        }

        // 3. Only settled sessions change anything
        if !session.is_paid() {
            tracing::info!(
                session_id,
                payment_status = %session.payment_status,
                "Checkout session not paid"
            );
            return Ok(ConfirmPaymentResult::NotPaid {
                payment_status: session.payment_status,
            });
        }

        let transaction_id = session
            .payment_intent
            .clone()
            .ok_or_else(|| ValidationError::empty_field("payment_intent"))?;
        let application_id = session
            .application_id()
            .ok_or_else(|| ValidationError::empty_field("applicationId"))
            .and_then(ApplicationId::parse)?;
        let amount_minor = session
            .amount_total
            .ok_or_else(|| ValidationError::empty_field("amount_total"))?;
        let currency = session
            .currency
            .clone()
            .ok_or_else(|| ValidationError::empty_field("currency"))?;

        let payment = Payment::confirmed(
            PaidCheckout {
                application_id,
                transaction_id,
                amount_minor,
                currency,
                customer_email: session.customer_email.clone(),
                loan_name: session.loan_name().map(str::to_string),
                payment_status: session.payment_status.clone(),
            },
            TrackingId::generate(),
            Timestamp::now(),
        )?;

        // 4. Insert payment and mark application paid, atomically
        match self.ledger.record_confirmation(&payment).await? {
            RecordOutcome::Recorded { application } => {
                tracing::info!(
                    session_id,
                    transaction_id = %payment.transaction_id,
                    tracking_id = %payment.tracking_id,
                    application_id = %payment.application_id,
                    modified = application.modified_count,
                    "Payment confirmed"
                );
                Ok(ConfirmPaymentResult::Confirmed {
                    transaction_id: payment.transaction_id,
                    tracking_id: payment.tracking_id,
                    application_update: application,
                    payment_id: payment.id,
                })
            }
            RecordOutcome::AlreadyRecorded(existing) => {
                tracing::debug!(
                    session_id,
                    transaction_id = %existing.transaction_id,
                    "Lost confirmation race; reporting stored payment"
                );
                Ok(ConfirmPaymentResult::AlreadyProcessed {
                    transaction_id: existing.transaction_id,
                    tracking_id: existing.tracking_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::application::{FeeStatus, LoanApplication};
    use crate::domain::foundation::ErrorCode;
    use crate::ports::{
        ApplicationRepository, CheckoutSessionState, PaymentError, METADATA_APPLICATION_ID,
        METADATA_LOAN_NAME,
    };
    use rust_decimal_macros::dec;
    use serde_json::Map;
    use std::collections::HashMap;

    struct Fixture {
        store: InMemoryStore,
        provider: MockPaymentProvider,
        handler: Arc<ConfirmPaymentHandler>,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let provider = MockPaymentProvider::new();
        let handler = Arc::new(ConfirmPaymentHandler::new(
            Arc::new(provider.clone()),
            Arc::new(store.clone()),
        ));
        Fixture {
            store,
            provider,
            handler,
        }
    }

    async fn seed_application(store: &InMemoryStore) -> LoanApplication {
        let app = LoanApplication::submit("a@x.com", None, "Home Loan", Map::new()).unwrap();
        store.save(&app).await.unwrap();
        app
    }

    fn session(application_id: &str, status: &str, intent: Option<&str>) -> CheckoutSessionState {
        CheckoutSessionState {
            id: "cs_test_a1".to_string(),
            payment_intent: intent.map(str::to_string),
            payment_status: status.to_string(),
            amount_total: Some(50_000),
            currency: Some("usd".to_string()),
            customer_email: Some("a@x.com".to_string()),
            metadata: HashMap::from([
                (METADATA_APPLICATION_ID.to_string(), application_id.to_string()),
                (METADATA_LOAN_NAME.to_string(), "Home Loan".to_string()),
            ]),
        }
    }

    fn confirm() -> ConfirmPaymentCommand {
        ConfirmPaymentCommand {
            session_id: "cs_test_a1".to_string(),
        }
    }

    #[tokio::test]
    async fn paid_session_marks_application_and_records_payment() {
        let f = fixture();
        let app = seed_application(&f.store).await;
        f.provider
            .add_session(session(app.id.as_str(), "paid", Some("pi_123")));

        let result = f.handler.handle(confirm()).await.unwrap();

        let ConfirmPaymentResult::Confirmed {
            transaction_id,
            tracking_id,
            application_update,
            ..
        } = result
        else {
            panic!("expected Confirmed, got {:?}", result);
        };
        assert_eq!(transaction_id, "pi_123");
        assert_eq!(application_update, UpdateCount::new(1, 1));

        let stored = f.store.find_by_id(&app.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_status, FeeStatus::Paid);
        assert_eq!(stored.transaction_id.as_deref(), Some("pi_123"));
        assert_eq!(stored.tracking_id.as_ref(), Some(&tracking_id));

        let payment = f.store.find_by_transaction_id("pi_123").await.unwrap().unwrap();
        assert_eq!(payment.amount, dec!(500));
        assert_eq!(payment.loan_name.as_deref(), Some("Home Loan"));
        assert_eq!(payment.tracking_id, tracking_id);
    }

    #[tokio::test]
    async fn second_confirmation_returns_same_tracking_id() {
        let f = fixture();
        let app = seed_application(&f.store).await;
        f.provider
            .add_session(session(app.id.as_str(), "paid", Some("pi_123")));

        let first = f.handler.handle(confirm()).await.unwrap();
        let second = f.handler.handle(confirm()).await.unwrap();

        assert!(matches!(second, ConfirmPaymentResult::AlreadyProcessed { .. }));
        assert_eq!(first.tracking_id(), second.tracking_id());
        assert_eq!(f.store.payment_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_confirmations_converge() {
        let f = fixture();
        let app = seed_application(&f.store).await;
        f.provider
            .add_session(session(app.id.as_str(), "paid", Some("pi_123")));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = f.handler.clone();
                tokio::spawn(async move { handler.handle(confirm()).await })
            })
            .collect();
        let results: Vec<ConfirmPaymentResult> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        let confirmed = results
            .iter()
            .filter(|r| matches!(r, ConfirmPaymentResult::Confirmed { .. }))
            .count();
        assert_eq!(confirmed, 1);
        assert!(results
            .iter()
            .all(|r| r.tracking_id() == results[0].tracking_id()));
        assert_eq!(f.store.payment_count().await, 1);
    }

    #[tokio::test]
    async fn unpaid_session_changes_nothing() {
        let f = fixture();
        let app = seed_application(&f.store).await;
        f.provider
            .add_session(session(app.id.as_str(), "unpaid", None));

        let result = f.handler.handle(confirm()).await.unwrap();

        assert_eq!(
            result,
            ConfirmPaymentResult::NotPaid {
                payment_status: "unpaid".to_string()
            }
        );
        let stored = f.store.find_by_id(&app.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_status, FeeStatus::Unpaid);
        assert_eq!(f.store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn missing_application_writes_nothing() {
        let f = fixture();
        f.provider.add_session(session("A404", "paid", Some("pi_9")));

        let err = f.handler.handle(confirm()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ApplicationNotFound);
        assert_eq!(f.store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn paid_session_without_application_metadata_is_invalid() {
        let f = fixture();
        let mut paid = session("A1", "paid", Some("pi_1"));
        paid.metadata.clear();
        f.provider.add_session(paid);

        let err = f.handler.handle(confirm()).await.unwrap_err();

        assert!(matches!(err, LendingError::ValidationFailed { ref field, .. } if field == "applicationId"));
        assert_eq!(f.store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn paid_session_without_amount_or_currency_writes_nothing() {
        let f = fixture();
        let app = seed_application(&f.store).await;
        let mut paid = session(app.id.as_str(), "paid", Some("pi_1"));
        paid.amount_total = None;
        f.provider.add_session(paid);

        let err = f.handler.handle(confirm()).await.unwrap_err();

        assert!(matches!(err, LendingError::ValidationFailed { ref field, .. } if field == "amount_total"));

        let mut paid = session(app.id.as_str(), "paid", Some("pi_1"));
        paid.currency = None;
        f.provider.add_session(paid);

        let err = f.handler.handle(confirm()).await.unwrap_err();

        assert!(matches!(err, LendingError::ValidationFailed { ref field, .. } if field == "currency"));
        assert_eq!(f.store.payment_count().await, 0);
        let stored = f.store.find_by_id(&app.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_status, FeeStatus::Unpaid);
    }

    #[tokio::test]
    async fn upstream_failure_is_retryable_and_writes_nothing() {
        let f = fixture();
        let app = seed_application(&f.store).await;
        f.provider
            .add_session(session(app.id.as_str(), "paid", Some("pi_123")));
        f.provider.set_error(PaymentError::network("connection reset"));

        let err = f.handler.handle(confirm()).await.unwrap_err();

        assert!(err.is_retryable());
        let stored = f.store.find_by_id(&app.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_status, FeeStatus::Unpaid);
        assert_eq!(f.store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let f = fixture();
        let err = f.handler.handle(confirm()).await.unwrap_err();
        assert!(matches!(err, LendingError::NotFound { resource: "checkout session", .. }));
    }

    #[tokio::test]
    async fn blank_session_id_is_rejected_without_calling_processor() {
        let f = fixture();
        let err = f
            .handler
            .handle(ConfirmPaymentCommand {
                session_id: " ".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LendingError::ValidationFailed { .. }));
        assert!(!f.provider.was_called("retrieve_checkout_session"));
    }
}
