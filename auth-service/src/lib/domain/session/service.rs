use std::sync::Arc;

use auth::RefreshSecret;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::RefreshTokenError;
use crate::domain::session::models::NewRefreshToken;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;

/// Issues, consumes and revokes opaque refresh tokens.
///
/// Only the SHA-256 digest of a secret reaches the repository. Every
/// successful `consume` makes the presented secret unusable.
pub struct RefreshTokenManager<RR>
where
    RR: RefreshTokenRepository,
{
    repository: Arc<RR>,
    ttl: Duration,
}

impl<RR> RefreshTokenManager<RR>
where
    RR: RefreshTokenRepository,
{
    /// # Arguments
    /// * `repository` - Refresh token persistence implementation
    /// * `ttl` - Lifetime of every minted token
    pub fn new(repository: Arc<RR>, ttl: Duration) -> Self {
        Self { repository, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a fresh secret for the user and persist its digest.
    ///
    /// # Returns
    /// Raw secret; this is the only place it ever exists in clear
    ///
    /// # Errors
    /// * `Entropy` - OS random source failed
    /// * `DatabaseError` - Record could not be stored
    pub async fn mint(&self, user_id: UserId) -> Result<RefreshSecret, RefreshTokenError> {
        let secret = RefreshSecret::generate()?;
        let now = Utc::now();

        self.repository
            .insert(NewRefreshToken {
                user_id,
                digest: secret.digest(),
                created_at: now,
                expires_at: now + self.ttl,
            })
            .await?;

        Ok(secret)
    }

    /// Revoke the record matching the presented secret and return its owner.
    ///
    /// # Errors
    /// * `NotFound` / `Revoked` / `Expired` - Secret is not live
    /// * `DatabaseError` - Store failure
    pub async fn consume(&self, presented: &str) -> Result<UserId, RefreshTokenError> {
        if presented.is_empty() {
            return Err(RefreshTokenError::NotFound);
        }

        self.repository
            .consume(&auth::refresh::digest(presented), Utc::now())
            .await
    }

    /// Revoke every live refresh token of the user. Idempotent.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64, RefreshTokenError> {
        let revoked = self.repository.revoke_all(user_id, Utc::now()).await?;
        tracing::debug!(user_id = %user_id, revoked, "Revoked refresh tokens");
        Ok(revoked)
    }
}
