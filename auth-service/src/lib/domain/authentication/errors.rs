use thiserror::Error;

use crate::user::errors::EmailError;

/// Rejected registration input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Role cannot be self-assigned: {0}")]
    RoleNotAllowed(String),
}

/// Outcome of a failed authentication operation.
///
/// Credential and token failures carry no detail so a caller cannot tell
/// which check rejected it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefresh,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal failure: {0}")]
    Internal(String),
}
