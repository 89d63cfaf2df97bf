use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// One issued refresh credential.
///
/// Mutated exactly once, when `revoked_at` is set by consumption or logout.
/// Rows are never deleted so replays stay detectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    /// Hex SHA-256 of the raw secret; the secret itself is never stored
    pub digest: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Live means neither revoked nor expired at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

/// Refresh record about to be persisted.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: UserId,
    pub digest: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
