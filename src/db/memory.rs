//! In-memory user and session stores.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::traits::{SessionStore, UserStore};
use super::{NewUser, SessionRecord, User};
use crate::{KeyholeError, Result};

/// User store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn add(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        // Check and insert under one write lock.
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(KeyholeError::Conflict("username".to_string()));
        }

        let user = User {
            user_id: users.last().map_or(1, |u| u.user_id + 1),
            username: new_user.username,
            password: new_user.password.into_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| u.username == username)
            .cloned()
            .collect())
    }
}

/// Session store held in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired or not.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn set(&self, token: &str, record: SessionRecord) -> Result<()> {
        self.sessions.write().await.insert(token.to_string(), record);
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<bool> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
