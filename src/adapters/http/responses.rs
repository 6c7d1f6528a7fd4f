//! Response bodies shared by several endpoint modules.

use serde::Serialize;

/// `{insertedId}` after a successful insert.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub inserted_id: String,
}

impl InsertedResponse {
    pub fn new(id: impl ToString) -> Self {
        Self {
            inserted_id: id.to_string(),
        }
    }
}

/// `{deletedCount}` after a delete.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_count: u64,
}

/// `{message}` for outcomes that are not errors but wrote nothing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
