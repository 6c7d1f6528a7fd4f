//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresLoanRepository` - loan listings
//! - `PostgresUserRepository` - user accounts, unique by email
//! - `PostgresApplicationRepository` - loan applications
//! - `PostgresPaymentLedger` - payments plus the paid-state transition

mod application_repository;
mod loan_repository;
mod payment_ledger;
mod user_repository;

pub use application_repository::PostgresApplicationRepository;
pub use loan_repository::PostgresLoanRepository;
pub use payment_ledger::PostgresPaymentLedger;
pub use user_repository::PostgresUserRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Open a pool sized by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Apply the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// `SELECT 1` round trip for the health endpoint.
pub async fn ping(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(db_error("ping"))?;
    Ok(())
}

fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, "Failed to {}", action);
        DomainError::database(format!("Failed to {}: {}", action, e))
    }
}
