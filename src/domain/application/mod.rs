//! Loan application domain module.
//!
//! - `aggregate` - LoanApplication entity and its paid transition
//! - `fee_status` - FeeStatus (`unpaid` | `paid`)

mod aggregate;
mod fee_status;

pub use aggregate::{LoanApplication, PaidTransition};
pub use fee_status::FeeStatus;
