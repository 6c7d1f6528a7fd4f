//! Loan listings offered on the platform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{LoanId, Timestamp, ValidationError};

/// `showHome` value that features a loan on the home page.
pub const FEATURED_FLAG: &str = "On";

/// Maximum number of loans returned by the home-page listing.
pub const FEATURED_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "_id")]
    pub id: LoanId,

    pub title: String,

    pub show_home: Option<String>,

    pub created_at: Timestamp,

    /// Rates, limits, category and other listing fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Loan {
    pub fn publish(
        title: impl Into<String>,
        show_home: Option<String>,
        details: Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            id: LoanId::new(),
            title,
            show_home,
            created_at: Timestamp::now(),
            details,
        })
    }

    /// True when the listing is shown on the home page.
    pub fn is_featured(&self) -> bool {
        self.show_home.as_deref() == Some(FEATURED_FLAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_requires_title() {
        assert!(Loan::publish("  ", None, Map::new()).is_err());
        assert_eq!(
            Loan::publish(" Home Loan ", None, Map::new()).unwrap().title,
            "Home Loan"
        );
    }

    #[test]
    fn featured_only_when_flag_is_on() {
        let on = Loan::publish("Car Loan", Some("On".to_string()), Map::new()).unwrap();
        let off = Loan::publish("Car Loan", Some("Off".to_string()), Map::new()).unwrap();
        let unset = Loan::publish("Car Loan", None, Map::new()).unwrap();
        assert!(on.is_featured());
        assert!(!off.is_featured());
        assert!(!unset.is_featured());
    }
}
