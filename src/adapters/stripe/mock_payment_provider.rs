//! Mock payment provider for testing and local runs.
//!
//! Behaves like a tiny Checkout backend:
//! - `create_checkout_session` stores an unpaid session
//! - `complete_payment` flips a session to paid with a payment intent
//! - errors can be injected globally or per method
//! - every call is logged for assertions

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CheckoutSessionRequest, CheckoutSessionState, PaymentError,
    PaymentProvider, PAYMENT_STATUS_PAID,
};

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// let session = mock.create_checkout_session(request).await?;
/// mock.complete_payment(&session.id, "pi_123");
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    sessions: HashMap<String, CheckoutSessionState>,
    created: Vec<CheckoutSessionRequest>,
    next_id: u64,
    next_error: Option<PaymentError>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Store a session as if the processor already knew it.
    pub fn add_session(&self, session: CheckoutSessionState) {
        self.state().sessions.insert(session.id.clone(), session);
    }

    /// Mark a stored session as paid by `payment_intent`.
    ///
    /// Returns false if the session is unknown.
    pub fn complete_payment(&self, session_id: &str, payment_intent: &str) -> bool {
        match self.state().sessions.get_mut(session_id) {
            Some(session) => {
                session.payment_status = PAYMENT_STATUS_PAID.to_string();
                session.payment_intent = Some(payment_intent.to_string());
                true
            }
            None => false,
        }
    }

    /// Fail the next call, whichever method it is.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Fail every call to `method` until cleared.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    /// Requests received by `create_checkout_session`.
    pub fn created_requests(&self) -> Vec<CheckoutSessionRequest> {
        self.state().created.clone()
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![request.application_id.clone(), request.unit_amount.to_string()],
        );
        self.check_error("create_checkout_session")?;

        let mut state = self.state();
        state.next_id += 1;
        let id = format!("cs_test_{}", state.next_id);

        state.sessions.insert(
            id.clone(),
            CheckoutSessionState {
                id: id.clone(),
                payment_intent: None,
                payment_status: "unpaid".to_string(),
                amount_total: Some(request.unit_amount),
                currency: Some(request.currency.clone()),
                customer_email: Some(request.customer_email.clone()),
                metadata: request.metadata(),
            },
        );
        state.created.push(request);

        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.test/c/pay/{}", id),
            id,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSessionState, PaymentError> {
        self.record_call("retrieve_checkout_session", vec![session_id.to_string()]);
        self.check_error("retrieve_checkout_session")?;

        self.state()
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(session_id))
    }
}
