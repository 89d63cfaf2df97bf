//! DashMap-backed stores used by unit and integration tests.

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::session::errors::RefreshTokenError;
use crate::domain::session::models::NewRefreshToken;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Users keyed by normalized email, with a secondary index by id.
pub struct InMemoryUserRepository {
    by_email: DashMap<String, User>,
    by_id: DashMap<i64, User>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            by_email: DashMap::new(),
            by_id: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        // The entry guard holds the shard lock, so uniqueness check and insert are atomic
        match self.by_email.entry(user.email.as_str().to_string()) {
            Entry::Occupied(_) => Err(UserError::EmailAlreadyExists(user.email.to_string())),
            Entry::Vacant(slot) => {
                let created = User {
                    id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
                    email: user.email,
                    password_hash: user.password_hash,
                    role: user.role,
                    created_at: Utc::now(),
                };
                self.by_id.insert(created.id.0, created.clone());
                slot.insert(created.clone());
                Ok(created)
            }
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.by_id.get(&id.0).map(|user| user.clone()))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self.by_email.get(email.as_str()).map(|user| user.clone()))
    }

    async fn update_role(&self, email: &EmailAddress, role: Role) -> Result<User, UserError> {
        let updated = {
            let mut user = self
                .by_email
                .get_mut(email.as_str())
                .ok_or_else(|| UserError::NotFound(email.to_string()))?;
            user.role = role;
            user.clone()
        };
        self.by_id.insert(updated.id.0, updated.clone());
        Ok(updated)
    }

    async fn ping(&self) -> Result<(), UserError> {
        Ok(())
    }
}

/// Refresh records keyed by digest.
pub struct InMemoryRefreshTokenRepository {
    tokens: DashMap<String, RefreshTokenRecord>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, digest: &str) -> Option<RefreshTokenRecord> {
        self.tokens.get(digest).map(|record| record.clone())
    }
}

impl Default for InMemoryRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let record = RefreshTokenRecord {
            user_id: token.user_id,
            digest: token.digest,
            created_at: token.created_at,
            expires_at: token.expires_at,
            revoked_at: None,
        };
        self.tokens.insert(record.digest.clone(), record.clone());
        Ok(record)
    }

    async fn consume(&self, digest: &str, now: DateTime<Utc>) -> Result<UserId, RefreshTokenError> {
        // get_mut holds the shard write lock for the check-and-set
        let mut record = self
            .tokens
            .get_mut(digest)
            .ok_or(RefreshTokenError::NotFound)?;

        if record.revoked_at.is_some() {
            return Err(RefreshTokenError::Revoked);
        }
        if record.expires_at <= now {
            return Err(RefreshTokenError::Expired);
        }

        record.revoked_at = Some(now);
        Ok(record.user_id)
    }

    async fn revoke_all(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, RefreshTokenError> {
        let mut revoked = 0;
        for mut record in self.tokens.iter_mut() {
            if record.user_id == user_id && record.revoked_at.is_none() {
                record.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
