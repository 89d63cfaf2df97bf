use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::session::errors::RefreshTokenError;
use crate::domain::session::models::NewRefreshToken;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;

pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> RefreshTokenError {
    RefreshTokenError::DatabaseError(e.to_string())
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, RefreshTokenError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.user_id.0)
        .bind(&token.digest)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(RefreshTokenRecord {
            user_id: token.user_id,
            digest: token.digest,
            created_at: token.created_at,
            expires_at: token.expires_at,
            revoked_at: None,
        })
    }

    async fn consume(&self, digest: &str, now: DateTime<Utc>) -> Result<UserId, RefreshTokenError> {
        // Single conditional write; concurrent consumers race on the row lock
        let consumed = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $2
            WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > $2
            RETURNING user_id
            "#,
        )
        .bind(digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        if let Some(row) = consumed {
            return Ok(UserId(row.try_get("user_id").map_err(database_error)?));
        }

        let existing = sqlx::query(
            r#"
            SELECT revoked_at, expires_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(digest)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match existing {
            None => Err(RefreshTokenError::NotFound),
            Some(row) => {
                let revoked_at: Option<DateTime<Utc>> =
                    row.try_get("revoked_at").map_err(database_error)?;
                if revoked_at.is_some() {
                    Err(RefreshTokenError::Revoked)
                } else {
                    Err(RefreshTokenError::Expired)
                }
            }
        }
    }

    async fn revoke_all(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, RefreshTokenError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $2
            WHERE user_id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(user_id.0)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
