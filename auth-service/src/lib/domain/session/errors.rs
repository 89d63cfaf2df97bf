use auth::RefreshSecretError;
use thiserror::Error;

/// Error for refresh token operations.
///
/// `NotFound`, `Revoked` and `Expired` are kept apart for logs only; the
/// authentication service reports all three identically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token already revoked")]
    Revoked,

    #[error("Refresh token expired")]
    Expired,

    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl RefreshTokenError {
    /// True for failures caused by the presented token rather than the store.
    pub fn is_rejection(&self) -> bool {
        match self {
            RefreshTokenError::NotFound
            | RefreshTokenError::Revoked
            | RefreshTokenError::Expired => true,
            RefreshTokenError::Entropy(_) | RefreshTokenError::DatabaseError(_) => false,
        }
    }
}

impl From<RefreshSecretError> for RefreshTokenError {
    fn from(err: RefreshSecretError) -> Self {
        match err {
            RefreshSecretError::EntropyUnavailable(msg) => RefreshTokenError::Entropy(msg),
        }
    }
}
