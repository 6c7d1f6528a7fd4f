//! User account repository port.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::user::User;

use super::{SaveResult, UpdateCount};

/// Repository port for user accounts.
///
/// Implementations must enforce unique emails.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user unless one with the same email exists.
    ///
    /// Returns `AlreadyExists` (and writes nothing) on an email clash.
    async fn insert_if_absent(&self, user: &User) -> Result<SaveResult, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Every user, newest first.
    async fn list_all(&self) -> Result<Vec<User>, DomainError>;

    /// Set the account status. A missing id yields a zero count.
    async fn update_status(&self, id: &AccountId, status: &str)
        -> Result<UpdateCount, DomainError>;
}
