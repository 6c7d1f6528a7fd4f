//! Errors surfaced by lending operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthorized | 401 |
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | ValidationFailed | 400 |
//! | UpstreamFailure (retryable) | 503 |
//! | UpstreamFailure | 502 |
//! | Infrastructure | 500 |
//!
//! A payment that was already reconciled is not an error; the confirmation
//! handler reports it as a result variant.

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    /// Missing or invalid identity token.
    Unauthorized,

    /// Authenticated, but not allowed to see the requested data.
    Forbidden { reason: String },

    /// Application, loan, user or checkout session does not exist.
    NotFound { resource: &'static str, id: String },

    /// Input failed validation.
    ValidationFailed { field: String, message: String },

    /// The payment processor or identity provider failed.
    UpstreamFailure { message: String, retryable: bool },

    /// Storage failure.
    Infrastructure(String),
}

impl LendingError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        LendingError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        LendingError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LendingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>, retryable: bool) -> Self {
        LendingError::UpstreamFailure {
            message: message.into(),
            retryable,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        LendingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LendingError::Unauthorized => ErrorCode::Unauthorized,
            LendingError::Forbidden { .. } => ErrorCode::Forbidden,
            LendingError::NotFound { resource, .. } => match *resource {
                "loan" => ErrorCode::LoanNotFound,
                "application" => ErrorCode::ApplicationNotFound,
                "user" => ErrorCode::UserNotFound,
                _ => ErrorCode::NotFound,
            },
            LendingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            LendingError::UpstreamFailure { .. } => ErrorCode::ExternalServiceError,
            LendingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            LendingError::Unauthorized => "unauthorized access".to_string(),
            LendingError::Forbidden { reason } => format!("forbidden access: {}", reason),
            LendingError::NotFound { resource, id } => format!("{} not found: {}", resource, id),
            LendingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            LendingError::UpstreamFailure { message, .. } => {
                format!("Payment processor error: {}", message)
            }
            LendingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// True if the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LendingError::UpstreamFailure {
                retryable: true,
                ..
            }
        )
    }
}

impl std::fmt::Display for LendingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LendingError {}

impl From<DomainError> for LendingError {
    fn from(err: DomainError) -> Self {
        let detail = |key: &str| err.details.get(key).cloned().unwrap_or_default();
        match err.code {
            ErrorCode::LoanNotFound => LendingError::not_found("loan", detail("id")),
            ErrorCode::ApplicationNotFound => {
                LendingError::not_found("application", detail("id"))
            }
            ErrorCode::UserNotFound => LendingError::not_found("user", detail("id")),
            ErrorCode::NotFound => LendingError::not_found("resource", detail("id")),
            ErrorCode::ValidationFailed => LendingError::ValidationFailed {
                field: detail("field"),
                message: err.message,
            },
            ErrorCode::Unauthorized => LendingError::Unauthorized,
            ErrorCode::Forbidden => LendingError::Forbidden {
                reason: err.message,
            },
            ErrorCode::ExternalServiceError => LendingError::upstream(err.message, false),
            ErrorCode::DuplicateTransaction
            | ErrorCode::DatabaseError
            | ErrorCode::InternalError => LendingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for LendingError {
    fn from(err: ValidationError) -> Self {
        LendingError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<AuthError> for LendingError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServiceUnavailable(msg) => LendingError::upstream(msg, true),
            _ => LendingError::Unauthorized,
        }
    }
}

impl From<LendingError> for DomainError {
    fn from(err: LendingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
