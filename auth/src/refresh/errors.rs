use thiserror::Error;

/// Error type for refresh secret generation.
#[derive(Debug, Clone, Error)]
pub enum RefreshSecretError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
