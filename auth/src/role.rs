use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Role carried by every account and every access token.
///
/// Closed set: anything that does not parse into one of these variants is
/// rejected rather than treated as an unknown, unprivileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Customer placing orders
    User,
    /// Courier delivering orders
    Courier,
    /// Operator, assigned out-of-band only
    Admin,
}

/// Error for role parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRoleError(pub String);

impl Role {
    /// Canonical lowercase name, as stored and as encoded in tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Courier => "courier",
            Role::Admin => "admin",
        }
    }

    /// Whether an account may pick this role for itself at registration.
    pub fn is_self_assignable(&self) -> bool {
        match self {
            Role::User | Role::Courier => true,
            Role::Admin => false,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Parse role from string (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "courier" => Ok(Role::Courier),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRoleError(s.to_string())),
        }
    }
}
