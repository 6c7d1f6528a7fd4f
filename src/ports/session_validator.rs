//! Session validation port for identity tokens.
//!
//! All implementations must verify:
//! - **Signature** against the identity provider's published keys
//! - **Issuer (iss)** and **Audience (aud)** for this project
//! - **Expiry (exp)**

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates bearer tokens and extracts the caller's identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed or badly signed tokens
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::MissingEmail` when the token has no email claim
/// - `AuthError::ServiceUnavailable` for transient key-fetch failures
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a token (without the `Bearer ` prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_validator_is_object_safe() {
        fn _accepts_dyn(_validator: &dyn SessionValidator) {}
    }
}
