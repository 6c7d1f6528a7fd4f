use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{all_loans, available_loans, create_loan, loan_details, LoanAppState};

pub fn loan_routes() -> Router<LoanAppState> {
    Router::new()
        .route("/loans", post(create_loan))
        .route("/availableLoans", get(available_loans))
        .route("/allLoans", get(all_loans))
        .route("/loan-details/:id", get(loan_details))
}
