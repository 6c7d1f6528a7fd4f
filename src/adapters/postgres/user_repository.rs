//! PostgreSQL implementation of UserRepository.
//!
//! Email uniqueness is enforced by the `users_email_key` index on
//! `lower(email)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::foundation::{AccountId, DomainError, Timestamp};
use crate::domain::user::User;
use crate::ports::{SaveResult, UpdateCount, UserRepository};

use super::db_error;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    role: String,
    status: Option<String>,
    profile: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: AccountId::parse(row.id)
                .map_err(|e| DomainError::database(format!("Invalid user id: {}", e)))?,
            email: row.email,
            role: row.role,
            status: row.status,
            created_at: Timestamp::from_datetime(row.created_at),
            profile: row.profile.0,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert_if_absent(&self, user: &User) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, role, status, profile, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.status)
        .bind(Json(&user.profile))
        .bind(user.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert user"))?;

        if result.rows_affected() == 0 {
            return Ok(SaveResult::AlreadyExists);
        }
        Ok(SaveResult::Inserted)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, status, profile, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user"))?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, status, profile, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list users"))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_status(
        &self,
        id: &AccountId,
        status: &str,
    ) -> Result<UpdateCount, DomainError> {
        // IS DISTINCT FROM keeps a no-op update out of the modified count.
        let matched: Option<(bool,)> = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id, status IS DISTINCT FROM $2 AS changed FROM users WHERE id = $1
            ),
            updated AS (
                UPDATE users SET status = $2
                WHERE id = $1 AND status IS DISTINCT FROM $2
                RETURNING id
            )
            SELECT changed FROM target
            "#,
        )
        .bind(id.as_str())
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update user status"))?;

        Ok(match matched {
            Some((true,)) => UpdateCount::new(1, 1),
            Some((false,)) => UpdateCount::new(1, 0),
            None => UpdateCount::none(),
        })
    }
}
