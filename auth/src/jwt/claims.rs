use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;
use crate::role::Role;

/// Access token claims.
///
/// Standard RFC 7519 registered claims plus the account role.
/// Nothing here is persisted; the signature and `exp` alone decide validity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (numeric user identifier, decimal encoded)
    pub sub: String,

    /// Role of the subject at issuance time
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl Claims {
    /// Create claims for a user with automatic expiration.
    ///
    /// # Arguments
    /// * `user_id` - Numeric user identifier
    /// * `role` - Current role of the user
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, role, iat, exp, and a fresh jti set
    pub fn for_user(user_id: i64, role: Role, ttl: Duration) -> Self {
        Self::issued_at(user_id, role, Utc::now(), ttl)
    }

    /// Create claims with an explicit issuance instant.
    pub fn issued_at(user_id: i64, role: Role, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expiration = now + ttl;

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Numeric user identifier carried in `sub`.
    ///
    /// # Errors
    /// * `Malformed` - Subject is not a decimal user id
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::Malformed(format!("Invalid subject: {}", self.sub)))
    }

    /// Expiration as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
