//! Loan Desk - loan application backend.
//!
//! Borrowers browse a loan catalogue, submit applications and pay the
//! processing fee through Stripe Checkout. A returned checkout session is
//! reconciled into exactly one payment record and a paid application.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
