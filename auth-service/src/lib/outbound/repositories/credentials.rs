use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::errors::CredentialStoreError;
use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::domain::session::ports::CredentialStore;

const USER_COLUMNS: &str =
    "id, email, password_hash, refresh_token_hash, created_at, updated_at";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    refresh_token_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = CredentialStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email).map_err(|e| {
            CredentialStoreError::Backend(format!("corrupt email for user {}: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            email,
            password_hash: row.password_hash,
            refresh_token_hash: row.refresh_token_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn backend(e: sqlx::Error) -> CredentialStoreError {
    CredentialStoreError::Backend(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return CredentialStoreError::DuplicateEmail(email.as_str().to_string());
                }
            }
            backend(e)
        })?;

        row.try_into()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(User::try_from).transpose()
    }

    async fn set_refresh_hash(&self, id: &UserId, hash: &str) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn rotate_refresh_hash(
        &self,
        id: &UserId,
        expected: &str,
        new_hash: &str,
    ) -> Result<bool, CredentialStoreError> {
        // Salted hashes are unique per issuance, so equality on the old value
        // pins the swap to the session the caller verified against
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2
            "#,
        )
        .bind(id.0)
        .bind(expected)
        .bind(new_hash)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_hash(&self, id: &UserId) -> Result<bool, CredentialStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = NULL, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash IS NOT NULL
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}
