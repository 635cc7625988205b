// ============================================================================
// Portal Infrastructure - PostgreSQL User Repository
// File: crates/portal-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{PgPool, FromRow};
use uuid::Uuid;
use tracing::{info, error};
use chrono::{DateTime, Utc};

use portal_core::domain::{Role, User};
use portal_core::error::DomainError;
use portal_core::repositories::UserRepository;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    /// A role string outside the `Role` enum means the table holds data this
    /// build does not understand.
    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            error!("User {} has unknown role '{}'", row.id, row.role);
            DomainError::InternalError(format!("unknown role '{}' for user {}", row.role, row.id))
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, DomainError> {
    rows.into_iter().map(User::try_from).collect()
}

/// Connectivity problems are retryable; anything else is a bug or bad data.
fn map_sqlx_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => DomainError::StoreUnavailable(e.to_string()),
        other => DomainError::InternalError(other.to_string()),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating user: {}", user.id);

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (
                id, name, email, password_hash, role, created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, name, email, password_hash, role, created_at, modified_at
            "#
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("creating user", e))?;

        User::try_from(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, email, password_hash, role, created_at, modified_at
            FROM users
            WHERE email = $1
            ORDER BY created_at
            "#
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("finding user by email", e))?;

        into_users(rows)
    }

    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, email, password_hash, role, created_at, modified_at
            FROM users
            ORDER BY created_at
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("listing users", e))?;

        into_users(rows)
    }

    async fn update_role(&self, name: &str, role: Role) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2, modified_at = NOW()
            WHERE id = (
                SELECT id FROM users
                WHERE name = $1
                ORDER BY created_at
                LIMIT 1
            )
            "#
        )
        .bind(name)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("updating user role", e))?;

        Ok(result.rows_affected() > 0)
    }
}
