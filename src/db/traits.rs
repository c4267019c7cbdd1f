//! Storage collaborator traits.
//!
//! The authentication core only talks to users and sessions through these
//! traits. Implementations must be safe to share across requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{NewUser, SessionRecord, User};
use crate::Result;

/// Persistent user store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return it with its assigned `user_id`.
    ///
    /// Returns [`crate::KeyholeError::Conflict`] if the username is taken.
    async fn add(&self, new_user: NewUser) -> Result<User>;

    /// Find users whose username matches exactly (case-sensitive).
    async fn find_by_username(&self, username: &str) -> Result<Vec<User>>;
}

/// Server-side session store keyed by opaque token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the record stored under `token`, if any.
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>>;

    /// Store `record` under `token`, replacing any previous record.
    async fn set(&self, token: &str, record: SessionRecord) -> Result<()>;

    /// Remove the record under `token`. Returns whether one existed.
    async fn destroy(&self, token: &str) -> Result<bool>;

    /// Remove every record expired at `now`. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}
