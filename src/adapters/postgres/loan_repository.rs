//! PostgreSQL implementation of LoanRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, LoanId, Timestamp};
use crate::domain::loan::{Loan, FEATURED_FLAG};
use crate::ports::LoanRepository;

use super::db_error;

pub struct PostgresLoanRepository {
    pool: PgPool,
}

impl PostgresLoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LoanRow {
    id: String,
    title: String,
    show_home: Option<String>,
    details: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<LoanRow> for Loan {
    type Error = DomainError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        Ok(Loan {
            id: LoanId::parse(row.id)
                .map_err(|e| DomainError::database(format!("Invalid loan id: {}", e)))?,
            title: row.title,
            show_home: row.show_home,
            created_at: Timestamp::from_datetime(row.created_at),
            details: row.details.0,
        })
    }
}

const SELECT_LOAN: &str = "SELECT id, title, show_home, details, created_at FROM loans";

#[async_trait]
impl LoanRepository for PostgresLoanRepository {
    async fn save(&self, loan: &Loan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, title, show_home, details, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(loan.id.as_str())
        .bind(&loan.title)
        .bind(&loan.show_home)
        .bind(Json(&loan.details))
        .bind(loan.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("save loan"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        let row: Option<LoanRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_LOAN))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find loan"))?;

        row.map(Loan::try_from).transpose()
    }

    async fn list_featured(&self, limit: usize) -> Result<Vec<Loan>, DomainError> {
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "{} WHERE show_home = $1 ORDER BY created_at DESC LIMIT $2",
            SELECT_LOAN
        ))
        .bind(FEATURED_FLAG)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list featured loans"))?;

        rows.into_iter().map(Loan::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Loan>, DomainError> {
        let rows: Vec<LoanRow> =
            sqlx::query_as(&format!("{} ORDER BY created_at DESC", SELECT_LOAN))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("list loans"))?;

        rows.into_iter().map(Loan::try_from).collect()
    }
}
