//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over ports.

pub mod accounts;
pub mod applications;
pub mod loans;
pub mod payment;

pub use accounts::{
    GetUserRoleHandler, ListUsersHandler, RegisterUserCommand, RegisterUserHandler,
    RegisterUserResult, UpdateUserStatusCommand, UpdateUserStatusHandler,
};
pub use applications::{
    DeleteApplicationHandler, GetApplicationHandler, ListApplicationsHandler,
    ListApplicationsQuery, SubmitApplicationCommand, SubmitApplicationHandler,
};
pub use loans::{CreateLoanCommand, CreateLoanHandler, GetLoanHandler, ListLoansHandler, ListLoansQuery};
pub use payment::{
    CheckoutSettings, ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult,
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
};
