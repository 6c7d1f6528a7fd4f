//! PostgreSQL implementation of ApplicationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::application::{FeeStatus, LoanApplication};
use crate::domain::foundation::{ApplicationId, DomainError, LoanId, Timestamp, ValidationError};
use crate::domain::payment::TrackingId;
use crate::ports::ApplicationRepository;

use super::db_error;

pub struct PostgresApplicationRepository {
    pool: PgPool,
}

impl PostgresApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    email: String,
    loan_id: Option<String>,
    loan_title: String,
    fee_status: String,
    transaction_id: Option<String>,
    tracking_id: Option<String>,
    details: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for LoanApplication {
    type Error = DomainError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ValidationError| {
            DomainError::database(format!("Invalid loan application row: {}", e))
        };

        Ok(LoanApplication {
            id: ApplicationId::parse(row.id).map_err(corrupt)?,
            email: row.email,
            loan_id: row.loan_id.map(LoanId::parse).transpose().map_err(corrupt)?,
            loan_title: row.loan_title,
            fee_status: row.fee_status.parse::<FeeStatus>().map_err(corrupt)?,
            transaction_id: row.transaction_id,
            tracking_id: row
                .tracking_id
                .map(|raw| raw.parse::<TrackingId>())
                .transpose()
                .map_err(corrupt)?,
            created_at: Timestamp::from_datetime(row.created_at),
            details: row.details.0,
        })
    }
}

const SELECT_APPLICATION: &str = r#"
    SELECT id, email, loan_id, loan_title, fee_status, transaction_id, tracking_id,
           details, created_at
    FROM loan_applications
"#;

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
    async fn save(&self, application: &LoanApplication) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO loan_applications (
                id, email, loan_id, loan_title, fee_status, transaction_id, tracking_id,
                details, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(application.id.as_str())
        .bind(&application.email)
        .bind(application.loan_id.as_ref().map(LoanId::as_str))
        .bind(&application.loan_title)
        .bind(application.fee_status.as_str())
        .bind(&application.transaction_id)
        .bind(application.tracking_id.as_ref().map(TrackingId::as_str))
        .bind(Json(&application.details))
        .bind(application.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("save loan application"))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, DomainError> {
        let row: Option<ApplicationRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_APPLICATION))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("find loan application"))?;

        row.map(LoanApplication::try_from).transpose()
    }

    async fn list(&self, email: Option<&str>) -> Result<Vec<LoanApplication>, DomainError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "{} WHERE ($1::text IS NULL OR lower(email) = lower($1)) ORDER BY created_at DESC",
            SELECT_APPLICATION
        ))
        .bind(email.map(str::trim))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list loan applications"))?;

        rows.into_iter().map(LoanApplication::try_from).collect()
    }

    async fn delete(&self, id: &ApplicationId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM loan_applications WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete loan application"))?;

        Ok(result.rows_affected())
    }
}
