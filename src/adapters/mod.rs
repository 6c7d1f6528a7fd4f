//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Firebase ID token verification
//! - `http` - axum REST API
//! - `memory` - In-memory storage for tests and local runs
//! - `postgres` - PostgreSQL storage
//! - `stripe` - Stripe Checkout

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
