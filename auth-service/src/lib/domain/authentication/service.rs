use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Role;
use chrono::Duration;
use tokio::sync::OnceCell;

use crate::authentication::errors::AuthError;
use crate::authentication::models::Identity;
use crate::authentication::models::RegisterCommand;
use crate::authentication::models::TokenPair;
use crate::authentication::ports::AuthServicePort;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::service::RefreshTokenManager;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Hashed on first use and verified against when a login names no account.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Domain service implementation for authentication operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Argon2 work runs on the blocking pool so it never stalls the runtime.
pub struct AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: RefreshTokenManager<RR>,
    authenticator: Arc<Authenticator>,
    decoy_hash: OnceCell<String>,
}

impl<UR, RR> AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Credential store
    /// * `refresh_tokens` - Refresh token store
    /// * `authenticator` - Password hashing and access token handling
    /// * `refresh_token_ttl` - Lifetime of minted refresh tokens
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<RR>,
        authenticator: Authenticator,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens: RefreshTokenManager::new(refresh_tokens, refresh_token_ttl),
            authenticator: Arc::new(authenticator),
            decoy_hash: OnceCell::new(),
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let authenticator = self.authenticator.clone();

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify the password against the stored hash and mint the access token.
    async fn authenticate(&self, password: String, user: &User) -> Result<String, AuthError> {
        let authenticator = self.authenticator.clone();
        let stored_hash = user.password_hash.clone();
        let (user_id, role) = (user.id, user.role);

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, user_id.0, role)
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?;

        match result {
            Ok(authenticated) => Ok(authenticated.access_token),
            Err(AuthenticationError::InvalidCredentials) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Stored credential unusable");
                Err(AuthError::Internal(e.to_string()))
            }
        }
    }

    /// Spend the same Argon2 work as a real check when the account is unknown.
    async fn verify_decoy(&self, password: String) {
        let decoy_hash = match self
            .decoy_hash
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
            .await
        {
            Ok(hash) => hash.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Decoy hash unavailable");
                return;
            }
        };
        let authenticator = self.authenticator.clone();

        let _ = tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, &decoy_hash)
        })
        .await;
    }

    async fn issue_refresh_token(&self, user_id: UserId) -> Result<String, AuthError> {
        self.refresh_tokens
            .mint(user_id)
            .await
            .map(|secret| secret.into_inner())
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn issue_pair(&self, user_id: UserId, role: Role) -> Result<TokenPair, AuthError> {
        let access_token = self
            .authenticator
            .issue_access_token(user_id.0, role)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self.issue_refresh_token(user_id).await?;

        Ok(self.pair(access_token, refresh_token))
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.authenticator.access_token_ttl().num_seconds(),
        )
    }
}

#[async_trait]
impl<UR, RR> AuthServicePort for AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError> {
        let password_hash = self
            .hash_password(command.password.expose().to_string())
            .await?;

        let user = self
            .users
            .create(NewUser {
                email: command.email,
                password_hash,
                role: command.role,
            })
            .await
            .map_err(|e| match e {
                UserError::EmailAlreadyExists(_) => AuthError::EmailTaken,
                other => AuthError::Internal(other.to_string()),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        self.issue_pair(user.id, user.role).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let email = EmailAddress::new(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = match self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            Some(user) => user,
            None => {
                self.verify_decoy(password.to_string()).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let access_token = self.authenticate(password.to_string(), &user).await?;
        let refresh_token = self.issue_refresh_token(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(self.pair(access_token, refresh_token))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let user_id = self
            .refresh_tokens
            .consume(refresh_token)
            .await
            .map_err(|e| {
                if e.is_rejection() {
                    tracing::warn!(reason = %e, "Refresh rejected");
                    AuthError::InvalidRefresh
                } else {
                    AuthError::Internal(e.to_string())
                }
            })?;

        // Re-read so the new access token carries the current role
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or_else(|| {
                tracing::warn!(user_id = %user_id, "Refresh for missing user");
                AuthError::InvalidRefresh
            })?;

        self.issue_pair(user.id, user.role).await
    }

    async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        let revoked = self
            .refresh_tokens
            .revoke_all(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user_id, revoked, "User logged out");

        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::debug!(reason = %e, "Access token rejected");
            AuthError::InvalidToken
        })?;

        let user_id = claims.user_id().map_err(|_| AuthError::InvalidToken)?;
        let expires_at = claims.expires_at().ok_or(AuthError::InvalidToken)?;

        Ok(Identity {
            user_id: UserId(user_id),
            role: claims.role,
            expires_at,
        })
    }

    async fn check_ready(&self) -> Result<(), AuthError> {
        self.users
            .ping()
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
