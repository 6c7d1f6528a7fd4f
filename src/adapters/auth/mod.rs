//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `firebase` - Firebase ID tokens verified against Google's JWKS
//! - `mock` - token table for tests and local runs

mod firebase;
mod mock;

pub use firebase::{FirebaseConfig, FirebaseSessionValidator};
pub use mock::MockSessionValidator;
