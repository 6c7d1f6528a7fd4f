//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what the `SessionValidator` port hands back
//! after verifying a bearer token. Nothing here depends on the identity
//! provider.

use super::UserId;
use thiserror::Error;

/// Caller identity extracted from a verified ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject assigned by the identity provider.
    pub id: UserId,

    /// Email claim; the key used for ownership checks.
    pub email: String,

    /// Whether the identity provider verified the email.
    pub email_verified: bool,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, email_verified: bool) -> Self {
        Self {
            id,
            email: email.into(),
            email_verified,
        }
    }

    /// Case-insensitive email comparison.
    pub fn owns_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token carries no email claim.
    #[error("Token has no email claim")]
    MissingEmail,

    /// The identity provider's keys could not be fetched.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// True if the caller should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        !self.is_transient()
    }

    /// True if the failure may clear up on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
