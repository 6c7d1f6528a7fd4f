//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, money, errors)
//! - `loan` - Loan listings
//! - `user` - Platform user accounts
//! - `application` - Loan applications and their fee status
//! - `payment` - Payment ledger entries and tracking ids

pub mod application;
mod errors;
pub mod foundation;
pub mod loan;
pub mod payment;
pub mod user;

pub use errors::LendingError;
