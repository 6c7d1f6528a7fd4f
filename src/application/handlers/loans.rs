//! Loan listing handlers.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::foundation::LoanId;
use crate::domain::loan::{Loan, FEATURED_LIMIT};
use crate::domain::LendingError;
use crate::ports::LoanRepository;

/// Command to publish a loan listing.
#[derive(Debug, Clone)]
pub struct CreateLoanCommand {
    pub title: String,
    pub show_home: Option<String>,
    pub details: Map<String, Value>,
}

pub struct CreateLoanHandler {
    loans: Arc<dyn LoanRepository>,
}

impl CreateLoanHandler {
    pub fn new(loans: Arc<dyn LoanRepository>) -> Self {
        Self { loans }
    }

    pub async fn handle(&self, cmd: CreateLoanCommand) -> Result<LoanId, LendingError> {
        let loan = Loan::publish(cmd.title, cmd.show_home, cmd.details)?;
        self.loans.save(&loan).await?;

        tracing::info!(loan_id = %loan.id, featured = loan.is_featured(), "Loan published");
        Ok(loan.id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListLoansQuery {
    /// Only the home-page selection (at most six, newest first).
    pub featured_only: bool,
}

pub struct ListLoansHandler {
    loans: Arc<dyn LoanRepository>,
}

impl ListLoansHandler {
    pub fn new(loans: Arc<dyn LoanRepository>) -> Self {
        Self { loans }
    }

    pub async fn handle(&self, query: ListLoansQuery) -> Result<Vec<Loan>, LendingError> {
        let loans = if query.featured_only {
            self.loans.list_featured(FEATURED_LIMIT).await?
        } else {
            self.loans.list_all().await?
        };
        Ok(loans)
    }
}

pub struct GetLoanHandler {
    loans: Arc<dyn LoanRepository>,
}

impl GetLoanHandler {
    pub fn new(loans: Arc<dyn LoanRepository>) -> Self {
        Self { loans }
    }

    pub async fn handle(&self, id: &str) -> Result<Loan, LendingError> {
        let loan_id = LoanId::parse(id)?;
        self.loans
            .find_by_id(&loan_id)
            .await?
            .ok_or_else(|| LendingError::not_found("loan", loan_id.as_str()))
    }
}
