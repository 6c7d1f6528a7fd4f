//! Loan application handlers.
//!
//! Fee status, transaction id and tracking id are owned by payment
//! reconciliation; submission always starts an application unpaid.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::application::LoanApplication;
use crate::domain::foundation::{ApplicationId, AuthenticatedUser, LoanId};
use crate::domain::LendingError;
use crate::ports::ApplicationRepository;

/// Command to submit a loan application.
#[derive(Debug, Clone)]
pub struct SubmitApplicationCommand {
    pub email: String,
    pub loan_id: Option<String>,
    pub loan_title: String,
    pub details: Map<String, Value>,
}

pub struct SubmitApplicationHandler {
    applications: Arc<dyn ApplicationRepository>,
}

impl SubmitApplicationHandler {
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    pub async fn handle(&self, cmd: SubmitApplicationCommand) -> Result<ApplicationId, LendingError> {
        let loan_id = cmd
            .loan_id
            .filter(|id| !id.trim().is_empty())
            .map(LoanId::parse)
            .transpose()?;

        let application =
            LoanApplication::submit(cmd.email, loan_id, cmd.loan_title, cmd.details)?;
        self.applications.save(&application).await?;

        tracing::info!(application_id = %application.id, "Loan application submitted");
        Ok(application.id)
    }
}

/// Query for the application list.
#[derive(Debug, Clone)]
pub struct ListApplicationsQuery {
    pub requester: AuthenticatedUser,
    /// When present, must be the requester's own email.
    pub email: Option<String>,
}

pub struct ListApplicationsHandler {
    applications: Arc<dyn ApplicationRepository>,
}

impl ListApplicationsHandler {
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    pub async fn handle(
        &self,
        query: ListApplicationsQuery,
    ) -> Result<Vec<LoanApplication>, LendingError> {
        let email = query.email.as_deref().filter(|e| !e.trim().is_empty());

        if let Some(email) = email {
            if !query.requester.owns_email(email) {
                tracing::warn!(
                    user_id = %query.requester.id,
                    "Application list requested for another email"
                );
                return Err(LendingError::forbidden("email does not match token"));
            }
        }

        Ok(self.applications.list(email).await?)
    }
}

pub struct GetApplicationHandler {
    applications: Arc<dyn ApplicationRepository>,
}

impl GetApplicationHandler {
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    pub async fn handle(&self, id: &str) -> Result<LoanApplication, LendingError> {
        let application_id = ApplicationId::parse(id)?;
        self.applications
            .find_by_id(&application_id)
            .await?
            .ok_or_else(|| LendingError::not_found("application", application_id.as_str()))
    }
}

pub struct DeleteApplicationHandler {
    applications: Arc<dyn ApplicationRepository>,
}

impl DeleteApplicationHandler {
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    /// Returns the number of applications removed (0 or 1).
    pub async fn handle(&self, id: &str) -> Result<u64, LendingError> {
        let application_id = ApplicationId::parse(id)?;
        let deleted = self.applications.delete(&application_id).await?;
        if deleted > 0 {
            tracing::info!(application_id = %application_id, "Loan application deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::application::FeeStatus;
    use crate::domain::foundation::{ErrorCode, UserId};

    fn requester(email: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("uid-1").unwrap(), email, true)
    }

    fn submit(email: &str) -> SubmitApplicationCommand {
        SubmitApplicationCommand {
            email: email.to_string(),
            loan_id: Some("L1".to_string()),
            loan_title: "Home Loan".to_string(),
            details: Map::new(),
        }
    }

    #[tokio::test]
    async fn submitted_application_starts_unpaid() {
        let store = Arc::new(InMemoryStore::new());
        let id = SubmitApplicationHandler::new(store.clone())
            .handle(submit("a@x.com"))
            .await
            .unwrap();

        let app = GetApplicationHandler::new(store).handle(id.as_str()).await.unwrap();

        assert_eq!(app.fee_status, FeeStatus::Unpaid);
        assert!(app.transaction_id.is_none());
        assert_eq!(app.loan_id.as_ref().map(LoanId::as_str), Some("L1"));
    }

    #[tokio::test]
    async fn list_filters_by_own_email() {
        let store = Arc::new(InMemoryStore::new());
        let submit_handler = SubmitApplicationHandler::new(store.clone());
        submit_handler.handle(submit("a@x.com")).await.unwrap();
        submit_handler.handle(submit("b@x.com")).await.unwrap();

        let list = ListApplicationsHandler::new(store);
        let own = list
            .handle(ListApplicationsQuery {
                requester: requester("a@x.com"),
                email: Some("a@x.com".to_string()),
            })
            .await
            .unwrap();
        let all = list
            .handle(ListApplicationsQuery {
                requester: requester("a@x.com"),
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(own.len(), 1);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn listing_someone_elses_email_is_forbidden() {
        let store = Arc::new(InMemoryStore::new());
        let err = ListApplicationsHandler::new(store)
            .handle(ListApplicationsQuery {
                requester: requester("a@x.com"),
                email: Some("b@x.com".to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let store = Arc::new(InMemoryStore::new());
        let id = SubmitApplicationHandler::new(store.clone())
            .handle(submit("a@x.com"))
            .await
            .unwrap();

        let delete = DeleteApplicationHandler::new(store.clone());
        assert_eq!(delete.handle(id.as_str()).await.unwrap(), 1);
        assert_eq!(delete.handle(id.as_str()).await.unwrap(), 0);

        let err = GetApplicationHandler::new(store)
            .handle(id.as_str())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApplicationNotFound);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let err = SubmitApplicationHandler::new(store)
            .handle(submit("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, LendingError::ValidationFailed { .. }));
    }
}
