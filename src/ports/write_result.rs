//! Outcomes shared by the storage ports.

use serde::Serialize;

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Row was inserted.
    Inserted,
    /// A row with the same unique key already existed; nothing was written.
    AlreadyExists,
}

impl SaveResult {
    pub fn was_inserted(&self) -> bool {
        matches!(self, SaveResult::Inserted)
    }
}

/// Rows matched and changed by an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCount {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateCount {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            matched_count,
            modified_count,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}
