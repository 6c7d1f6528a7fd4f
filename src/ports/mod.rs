//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `PaymentProvider` - Hosted checkout (Stripe)
//! - `SessionValidator` - Identity token verification (Firebase)
//!
//! ## Storage Ports
//!
//! - `LoanRepository`, `UserRepository`, `ApplicationRepository` - CRUD
//! - `PaymentLedger` - Atomic payment + application reconciliation

mod application_repository;
mod loan_repository;
mod payment_ledger;
mod payment_provider;
mod session_validator;
mod user_repository;
mod write_result;

pub use application_repository::ApplicationRepository;
pub use loan_repository::LoanRepository;
pub use payment_ledger::{PaymentLedger, RecordOutcome};
pub use payment_provider::{
    CheckoutSession, CheckoutSessionRequest, CheckoutSessionState, PaymentError,
    PaymentErrorCode, PaymentProvider, METADATA_APPLICATION_ID, METADATA_LOAN_NAME,
    PAYMENT_STATUS_PAID,
};
pub use session_validator::SessionValidator;
pub use user_repository::UserRepository;
pub use write_result::{SaveResult, UpdateCount};
