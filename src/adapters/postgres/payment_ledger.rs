//! PostgreSQL implementation of PaymentLedger.
//!
//! The payment insert and the application update share one transaction.
//! The `payments_transaction_id_key` unique constraint decides which of two
//! concurrent confirmations wins; the loser sees no inserted row and reads
//! back the winner's payment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::foundation::{
    ApplicationId, DomainError, ErrorCode, PaymentId, Timestamp, ValidationError,
};
use crate::domain::payment::{Payment, TrackingId};
use crate::ports::{PaymentLedger, RecordOutcome, UpdateCount};

use super::db_error;

pub struct PostgresPaymentLedger {
    pool: PgPool,
}

impl PostgresPaymentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: String,
    amount: Decimal,
    currency: String,
    customer_email: Option<String>,
    application_id: String,
    loan_name: Option<String>,
    transaction_id: String,
    payment_status: String,
    paid_at: DateTime<Utc>,
    tracking_id: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let corrupt =
            |e: ValidationError| DomainError::database(format!("Invalid payment row: {}", e));

        Ok(Payment {
            id: PaymentId::parse(row.id).map_err(corrupt)?,
            amount: row.amount.normalize(),
            currency: row.currency,
            customer_email: row.customer_email,
            application_id: ApplicationId::parse(row.application_id).map_err(corrupt)?,
            loan_name: row.loan_name,
            transaction_id: row.transaction_id,
            payment_status: row.payment_status,
            paid_at: Timestamp::from_datetime(row.paid_at),
            tracking_id: row.tracking_id.parse::<TrackingId>().map_err(corrupt)?,
        })
    }
}

const SELECT_PAYMENT: &str = r#"
    SELECT id, amount, currency, customer_email, application_id, loan_name,
           transaction_id, payment_status, paid_at, tracking_id
    FROM payments
    WHERE transaction_id = $1
"#;

async fn insert_payment(
    tx: &mut Transaction<'_, Postgres>,
    payment: &Payment,
) -> Result<bool, DomainError> {
    let inserted: Option<(String,)> = sqlx::query_as(
        r#"
        INSERT INTO payments (
            id, amount, currency, customer_email, application_id, loan_name,
            transaction_id, payment_status, paid_at, tracking_id
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT ON CONSTRAINT payments_transaction_id_key DO NOTHING
        RETURNING id
        "#,
    )
    .bind(payment.id.as_str())
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(&payment.customer_email)
    .bind(payment.application_id.as_str())
    .bind(&payment.loan_name)
    .bind(&payment.transaction_id)
    .bind(&payment.payment_status)
    .bind(payment.paid_at.as_datetime())
    .bind(payment.tracking_id.as_str())
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_error("insert payment"))?;

    Ok(inserted.is_some())
}

/// Marks the application paid unless it already is. First transaction wins.
async fn mark_application_paid(
    tx: &mut Transaction<'_, Postgres>,
    payment: &Payment,
) -> Result<UpdateCount, DomainError> {
    let modified = sqlx::query(
        r#"
        UPDATE loan_applications
        SET fee_status = 'paid', transaction_id = $2, tracking_id = $3
        WHERE id = $1 AND fee_status = 'unpaid'
        "#,
    )
    .bind(payment.application_id.as_str())
    .bind(&payment.transaction_id)
    .bind(payment.tracking_id.as_str())
    .execute(&mut **tx)
    .await
    .map_err(db_error("mark application paid"))?
    .rows_affected();

    if modified > 0 {
        return Ok(UpdateCount::new(modified, modified));
    }

    let exists: Option<(String,)> =
        sqlx::query_as("SELECT id FROM loan_applications WHERE id = $1")
            .bind(payment.application_id.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("find loan application"))?;

    Ok(match exists {
        Some(_) => UpdateCount::new(1, 0),
        None => UpdateCount::none(),
    })
}

#[async_trait]
impl PaymentLedger for PostgresPaymentLedger {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(SELECT_PAYMENT)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find payment"))?;

        row.map(Payment::try_from).transpose()
    }

    async fn record_confirmation(&self, payment: &Payment) -> Result<RecordOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        if !insert_payment(&mut tx, payment).await? {
            tx.rollback().await.map_err(db_error("rollback"))?;

            let existing = self
                .find_by_transaction_id(&payment.transaction_id)
                .await?
                .ok_or_else(|| {
                    DomainError::database(format!(
                        "payment {} vanished after conflict",
                        payment.transaction_id
                    ))
                })?;
            tracing::debug!(
                transaction_id = %payment.transaction_id,
                "Payment already recorded"
            );
            return Ok(RecordOutcome::AlreadyRecorded(existing));
        }

        let application = mark_application_paid(&mut tx, payment).await?;
        if application.matched_count == 0 {
            tx.rollback().await.map_err(db_error("rollback"))?;
            return Err(DomainError::new(
                ErrorCode::ApplicationNotFound,
                format!("Application {} not found", payment.application_id),
            )
            .with_detail("id", payment.application_id.as_str()));
        }

        tx.commit().await.map_err(db_error("commit payment"))?;

        Ok(RecordOutcome::Recorded { application })
    }
}
