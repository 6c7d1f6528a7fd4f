//! Mock session validator for tests and local runs.
//!
//! Maps opaque tokens to users so handlers can be exercised without
//! minting real Firebase tokens.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_user("token-a", "a@x.com");
//!
//! let user = validator.validate("token-a").await?;
//! assert_eq!(user.email, "a@x.com");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Tokens not registered here return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Registers a verified user whose uid is derived from the email.
    pub fn with_test_user(self, token: impl Into<String>, email: &str) -> Self {
        let uid = format!("uid-{}", email.split('@').next().unwrap_or(email));
        let user = match UserId::new(uid) {
            Ok(id) => AuthenticatedUser::new(id, email, true),
            Err(_) => return self,
        };
        self.with_user(token, user)
    }

    /// Every validation fails with `error` until cleared.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_token_validates() {
        let validator = MockSessionValidator::new().with_test_user("t1", "a@x.com");

        let user = validator.validate("t1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.id.as_str(), "uid-a");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new();
        assert_eq!(
            validator.validate("nope").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn forced_error_wins_until_cleared() {
        let validator = MockSessionValidator::new()
            .with_test_user("t1", "a@x.com")
            .with_error(AuthError::TokenExpired);

        assert_eq!(
            validator.validate("t1").await.unwrap_err(),
            AuthError::TokenExpired
        );

        validator.clear_error();
        assert!(validator.validate("t1").await.is_ok());
    }

    #[tokio::test]
    async fn removed_token_stops_validating() {
        let validator = MockSessionValidator::new().with_test_user("t1", "a@x.com");
        validator.remove_token("t1");
        assert!(validator.validate("t1").await.is_err());
    }
}
