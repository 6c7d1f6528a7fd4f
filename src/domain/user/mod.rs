//! Platform user accounts (borrowers, managers, admins).
//!
//! Role and status are free text. The platform's client decides what
//! roles exist; this service stores and reports them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{AccountId, Timestamp, ValidationError};

/// Role assigned when a registration does not name one.
pub const DEFAULT_ROLE: &str = "borrower";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: AccountId,

    /// Unique across users.
    pub email: String,

    pub role: String,

    pub status: Option<String>,

    pub created_at: Timestamp,

    /// Display name, photo and other profile fields.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn register(
        email: impl Into<String>,
        role: Option<String>,
        status: Option<String>,
        profile: Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @"));
        }

        let role = role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        Ok(Self {
            id: AccountId::new(),
            email,
            role,
            status,
            created_at: Timestamp::now(),
            profile,
        })
    }
}
