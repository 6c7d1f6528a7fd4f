//! Strongly-typed identifier value objects.
//!
//! Entity ids are opaque strings. New ids are random UUIDs, but ids minted
//! elsewhere (imported documents, client fixtures) are accepted as long as
//! they are non-blank.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier, rejecting blank values.
            pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::parse(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a loan listing.
    LoanId,
    "loanId"
);

entity_id!(
    /// Identifier of a loan application.
    ApplicationId,
    "applicationId"
);

entity_id!(
    /// Identifier of a recorded payment.
    PaymentId,
    "paymentId"
);

entity_id!(
    /// Identifier of a stored user account.
    AccountId,
    "userId"
);

/// Identity-provider subject (the Firebase `uid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a UserId, rejecting empty values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique_uuids() {
        let a = ApplicationId::new();
        assert_ne!(a, ApplicationId::new());
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn parse_accepts_foreign_ids() {
        let id: ApplicationId = "A1".parse().unwrap();
        assert_eq!(id.as_str(), "A1");
        assert_eq!(id.to_string(), "A1");
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(LoanId::parse("  L7 ").unwrap().as_str(), "L7");
        assert_eq!(
            PaymentId::parse(" "),
            Err(ValidationError::empty_field("paymentId"))
        );
    }

    #[test]
    fn serde_goes_through_validation() {
        let id: AccountId = serde_json::from_str("\"u-1\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-1\"");
        assert!(serde_json::from_str::<AccountId>("\"\"").is_err());
    }

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("  ").is_err());
        assert_eq!(UserId::new("firebase-uid-1").unwrap().as_str(), "firebase-uid-1");
    }
}
