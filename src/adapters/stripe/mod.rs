//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe Checkout:
//! - hosted checkout session creation
//! - checkout session retrieval for reconciliation
//!
//! The secret key is held in a `secrecy::SecretString` and never logged.

mod checkout_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use checkout_types::{StripeCheckoutSession, StripeCustomerDetails};
pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
