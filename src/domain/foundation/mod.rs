//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, money conversion, auth types and the error
//! vocabulary used by every lending aggregate.

mod auth;
mod errors;
mod ids;
mod money;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, ApplicationId, LoanId, PaymentId, UserId};
pub use money::{from_minor_units, to_minor_units};
pub use timestamp::Timestamp;
