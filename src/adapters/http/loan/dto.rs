//! Request types for the loan catalogue endpoints.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::application::handlers::CreateLoanCommand;

/// Body of `POST /loans`: a title, the optional home-page flag, and any
/// other descriptive fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub show_home: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<CreateLoanRequest> for CreateLoanCommand {
    fn from(request: CreateLoanRequest) -> Self {
        Self {
            title: request.title,
            show_home: request.show_home,
            details: request.details,
        }
    }
}
