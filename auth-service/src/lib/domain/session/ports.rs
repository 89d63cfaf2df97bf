use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::RefreshTokenError;
use crate::domain::session::models::NewRefreshToken;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::user::models::UserId;

/// Persistence operations for refresh token records.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a newly issued refresh token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, RefreshTokenError>;

    /// Atomically mark the record with this digest revoked and return its owner.
    ///
    /// The read and the write must be one conditional update guarded by
    /// "not revoked and not expired at `now`". Of several concurrent calls for
    /// the same digest exactly one may succeed.
    ///
    /// # Errors
    /// * `NotFound` - No record has this digest
    /// * `Revoked` - Record was already revoked
    /// * `Expired` - Record expired at or before `now`
    /// * `DatabaseError` - Database operation failed
    async fn consume(&self, digest: &str, now: DateTime<Utc>) -> Result<UserId, RefreshTokenError>;

    /// Revoke every record of the user that is not revoked yet.
    ///
    /// # Returns
    /// Number of records revoked by this call (0 when nothing was live)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn revoke_all(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, RefreshTokenError>;
}
