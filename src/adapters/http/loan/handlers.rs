//! HTTP handlers for the loan catalogue.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::responses::InsertedResponse;
use crate::application::handlers::{
    CreateLoanHandler, GetLoanHandler, ListLoansHandler, ListLoansQuery,
};
use crate::ports::LoanRepository;

use super::dto::CreateLoanRequest;

#[derive(Clone)]
pub struct LoanAppState {
    pub loans: Arc<dyn LoanRepository>,
}

/// POST /loans
pub async fn create_loan(
    State(state): State<LoanAppState>,
    Json(request): Json<CreateLoanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = CreateLoanHandler::new(state.loans.clone())
        .handle(request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(InsertedResponse::new(id))))
}

/// GET /availableLoans
pub async fn available_loans(
    State(state): State<LoanAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let loans = ListLoansHandler::new(state.loans.clone())
        .handle(ListLoansQuery { featured_only: true })
        .await?;

    Ok(Json(loans))
}

/// GET /allLoans
pub async fn all_loans(State(state): State<LoanAppState>) -> Result<impl IntoResponse, ApiError> {
    let loans = ListLoansHandler::new(state.loans.clone())
        .handle(ListLoansQuery { featured_only: false })
        .await?;

    Ok(Json(loans))
}

/// GET /loan-details/:id
pub async fn loan_details(
    State(state): State<LoanAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let loan = GetLoanHandler::new(state.loans.clone()).handle(&id).await?;
    Ok(Json(loan))
}
