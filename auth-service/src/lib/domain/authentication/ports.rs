use async_trait::async_trait;

use crate::authentication::errors::AuthError;
use crate::authentication::models::Identity;
use crate::authentication::models::RegisterCommand;
use crate::authentication::models::TokenPair;
use crate::domain::user::models::UserId;

/// Authentication operations exposed to inbound adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and sign it in.
    ///
    /// # Errors
    /// * `EmailTaken` - Normalized email is already registered
    /// * `Internal` - Hashing, store, or token failure
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError>;

    /// Exchange email and password for a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Internal` - Store or token failure
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Rotate a refresh token into a new pair.
    ///
    /// # Errors
    /// * `InvalidRefresh` - Unknown, consumed, revoked or expired refresh token
    /// * `Internal` - Store or token failure
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Revoke every refresh token of the user.
    ///
    /// # Errors
    /// * `Internal` - Store failure
    async fn logout(&self, user_id: UserId) -> Result<(), AuthError>;

    /// Check an access token and extract the caller identity.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, expired, or malformed
    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError>;

    /// Report whether the backing stores are reachable.
    ///
    /// # Errors
    /// * `Internal` - Store cannot be reached
    async fn check_ready(&self) -> Result<(), AuthError>;
}
