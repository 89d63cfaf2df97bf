use std::fmt;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::authentication::errors::ValidationError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;

/// Plaintext password in transit; never logged or persisted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Minimum length in characters.
    pub const MIN_LENGTH: usize = 8;

    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.chars().count() < Self::MIN_LENGTH {
            return Err(ValidationError::PasswordTooShort(Self::MIN_LENGTH));
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// # Arguments
    /// * `email` - Raw email, normalized here
    /// * `password` - Plaintext password, at least 8 characters
    /// * `role` - Optional role name; absent or blank defaults to `user`
    ///
    /// # Errors
    /// * `Email` - Empty or malformed email
    /// * `PasswordTooShort` - Password under the minimum length
    /// * `UnknownRole` - Role name outside the closed set
    /// * `RoleNotAllowed` - Role that may not be self-assigned (`admin`)
    pub fn parse(email: &str, password: &str, role: Option<&str>) -> Result<Self, ValidationError> {
        let email = EmailAddress::new(email)?;
        let password = Password::new(password)?;
        // A blank role means "not given"
        let role = match role.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Role::default(),
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| ValidationError::UnknownRole(e.0))?,
        };

        if !role.is_self_assignable() {
            return Err(ValidationError::RoleNotAllowed(role.to_string()));
        }

        Ok(Self {
            email,
            password,
            role,
        })
    }
}

/// Access and refresh token pair returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    pub const TOKEN_TYPE: &'static str = "Bearer";

    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: Self::TOKEN_TYPE,
            expires_in,
        }
    }
}

/// Verified caller identity, attached to the request by the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}
