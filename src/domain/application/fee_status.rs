//! Processing-fee status of a loan application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Whether the application's processing fee has been paid.
///
/// Transitions only `Unpaid -> Paid`, and only through payment
/// reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    #[default]
    Unpaid,
    Paid,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Unpaid => "unpaid",
            FeeStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(FeeStatus::Unpaid),
            "paid" => Ok(FeeStatus::Paid),
            other => Err(ValidationError::invalid_format(
                "FeeStatus",
                format!("unknown fee status '{}'", other),
            )),
        }
    }
}
