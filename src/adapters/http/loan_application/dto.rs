//! Request and response types for the loan application endpoints.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::application::handlers::SubmitApplicationCommand;

/// Keys the server owns; clients cannot set them on submission.
const SERVER_OWNED_KEYS: [&str; 5] = ["_id", "FeeStatus", "transactionId", "trackingId", "createdAt"];

/// Body of `POST /loanApplications`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub loan_id: Option<String>,
    #[serde(default)]
    pub loan_title: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<SubmitApplicationRequest> for SubmitApplicationCommand {
    fn from(request: SubmitApplicationRequest) -> Self {
        let mut details = request.details;
        for key in SERVER_OWNED_KEYS {
            details.remove(key);
        }

        Self {
            email: request.email,
            loan_id: request.loan_id,
            loan_title: request.loan_title,
            details,
        }
    }
}

/// Query of `GET /loanApplications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListApplicationsParams {
    pub email: Option<String>,
}
