use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::RefreshSecretError;

/// Number of random bytes in a refresh secret (256 bits).
pub const SECRET_LEN: usize = 32;

/// Opaque refresh secret handed to the client.
///
/// Only [`RefreshSecret::digest`] may be persisted. `Debug` is redacted so
/// the raw value cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshSecret(String);

impl RefreshSecret {
    /// Generate a new secret from the operating system RNG.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The OS entropy source failed
    pub fn generate() -> Result<Self, RefreshSecretError> {
        let mut bytes = [0u8; SECRET_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| RefreshSecretError::EntropyUnavailable(e.to_string()))?;

        Ok(Self(URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Wrap a secret presented by a client.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// One-way fingerprint used as the storage key.
    ///
    /// # Returns
    /// Lowercase hex SHA-256 of the secret
    pub fn digest(&self) -> String {
        digest(&self.0)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for RefreshSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshSecret(<redacted>)")
    }
}

/// Hex SHA-256 of a raw refresh secret.
pub fn digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
