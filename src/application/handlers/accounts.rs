//! User account handlers.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::foundation::{AccountId, ValidationError};
use crate::domain::user::User;
use crate::domain::LendingError;
use crate::ports::{SaveResult, UpdateCount, UserRepository};

/// Command to register a user. Registering an existing email is a no-op.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: String,
    pub role: Option<String>,
    pub status: Option<String>,
    pub profile: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterUserResult {
    Created(AccountId),
    AlreadyExists,
}

pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
}

impl RegisterUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<RegisterUserResult, LendingError> {
        let user = User::register(cmd.email, cmd.role, cmd.status, cmd.profile)?;

        match self.users.insert_if_absent(&user).await? {
            SaveResult::Inserted => {
                tracing::info!(user_id = %user.id, role = %user.role, "User registered");
                Ok(RegisterUserResult::Created(user.id))
            }
            SaveResult::AlreadyExists => Ok(RegisterUserResult::AlreadyExists),
        }
    }
}

pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self) -> Result<Vec<User>, LendingError> {
        Ok(self.users.list_all().await?)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUserStatusCommand {
    pub user_id: String,
    pub status: String,
}

pub struct UpdateUserStatusHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserStatusHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// A missing user is reported through a zero matched count.
    pub async fn handle(&self, cmd: UpdateUserStatusCommand) -> Result<UpdateCount, LendingError> {
        let user_id = AccountId::parse(cmd.user_id)?;
        let status = cmd.status.trim();
        if status.is_empty() {
            return Err(ValidationError::empty_field("status").into());
        }

        let result = self.users.update_status(&user_id, status).await?;
        tracing::info!(
            user_id = %user_id,
            status,
            matched = result.matched_count,
            "User status updated"
        );
        Ok(result)
    }
}

pub struct GetUserRoleHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserRoleHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// `None` when no user has this email.
    pub async fn handle(&self, email: &str) -> Result<Option<String>, LendingError> {
        Ok(self
            .users
            .find_by_email(email)
            .await?
            .map(|user| user.role))
    }
}
