//! Request and response types for the user endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::handlers::RegisterUserCommand;

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl From<RegisterUserRequest> for RegisterUserCommand {
    fn from(request: RegisterUserRequest) -> Self {
        Self {
            email: request.email,
            role: request.role,
            status: request.status,
            profile: request.profile,
        }
    }
}

/// Body of `PATCH /users/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoleResponse {
    pub role: Option<String>,
}
