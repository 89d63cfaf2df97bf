//! Authentication utilities library
//!
//! Provides the credential primitives shared by every service that issues or
//! checks access tokens:
//! - Password hashing (Argon2id, configurable work factor)
//! - Access token minting and verification (HS256 JWT)
//! - Refresh secret generation and digesting
//! - The closed set of account roles
//!
//! Services verifying inbound requests only need [`JwtHandler`] (or
//! [`Authenticator::validate_token`]) and [`Role`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(8, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{JwtHandler, Role};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.mint(42, Role::Courier, Duration::minutes(15)).unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.user_id().unwrap(), 42);
//! assert_eq!(claims.role, Role::Courier);
//! ```
//!
//! ## Refresh Secrets
//! ```
//! use auth::RefreshSecret;
//!
//! let secret = RefreshSecret::generate().unwrap();
//! // Persist only the digest; hand `secret.expose()` to the client.
//! assert_eq!(secret.digest().len(), 64);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod role;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::RefreshSecret;
pub use refresh::RefreshSecretError;
pub use role::Role;
pub use role::UnknownRoleError;
