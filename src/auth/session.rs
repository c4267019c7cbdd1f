//! Session lifecycle for Keyhole.
//!
//! A token is either `Anonymous` (no live record) or `Authenticated`
//! (a live record holding a user snapshot). Login mints a new
//! `Authenticated` token and retires the caller's previous one; logout
//! moves a token back to `Anonymous`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::AuthError;
use crate::db::{SessionRecord, SessionStore, User};
use crate::{KeyholeError, Result};

/// Default absolute session lifetime (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// What a logout call found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// A live session existed and was destroyed.
    LoggedOut,
    /// There was no live session for the token.
    NoSession,
    /// Destroying the session failed in the store.
    Failed,
}

impl LogoutOutcome {
    /// Client-facing message for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            LogoutOutcome::LoggedOut => "logged out",
            LogoutOutcome::NoSession => "no session",
            LogoutOutcome::Failed => "error",
        }
    }
}

/// Binds authenticated users to opaque session tokens.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a session manager over `store` with the default lifetime.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_ttl(store, Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }

    /// Create a session manager with a custom session lifetime.
    pub fn with_ttl(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read a live record, removing it if it has expired.
    async fn live_record(&self, token: &str) -> Result<Option<SessionRecord>> {
        match self.store.get(token).await? {
            Some(record) if record.is_expired() => {
                debug!("Dropping expired session");
                self.store.destroy(token).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Store `user` in a new session and return its token.
    ///
    /// A fresh token is minted on every login. If `current_token` names a
    /// live session, that session is destroyed, so a client holds at most
    /// one session and a token issued before login never becomes
    /// authenticated.
    pub async fn login(
        &self,
        current_token: Option<&str>,
        user: User,
    ) -> std::result::Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(self.ttl).map_err(|e| {
            KeyholeError::SessionStore(format!("session lifetime out of range: {e}"))
        })?;
        let record = SessionRecord::new(user, ttl)?;

        if let Some(previous) = current_token {
            if self.live_record(previous).await?.is_some() {
                self.store.destroy(previous).await?;
                debug!("Replaced previous session on login");
            }
        }

        let token = Uuid::new_v4().to_string();
        let user_id = record.user.user_id;
        self.store.set(&token, record).await?;

        info!(user_id, "Session established");
        Ok(token)
    }

    /// The user bound to `token`, if the session is live.
    pub async fn current_user(&self, token: &str) -> std::result::Result<Option<User>, AuthError> {
        Ok(self.live_record(token).await?.map(|record| record.user))
    }

    /// End the session bound to `token`.
    ///
    /// Never fails: store errors are logged and reported as
    /// [`LogoutOutcome::Failed`].
    pub async fn logout(&self, token: Option<&str>) -> LogoutOutcome {
        let Some(token) = token else {
            return LogoutOutcome::NoSession;
        };

        let record = match self.live_record(token).await {
            Ok(Some(record)) => record,
            Ok(None) => return LogoutOutcome::NoSession,
            Err(e) => {
                error!(error = %e, "Failed to read session during logout");
                return LogoutOutcome::Failed;
            }
        };

        match self.store.destroy(token).await {
            Ok(true) => {
                info!(user_id = record.user.user_id, "Session logged out");
                LogoutOutcome::LoggedOut
            }
            // Destroyed concurrently between the read and the delete.
            Ok(false) => LogoutOutcome::NoSession,
            Err(e) => {
                error!(error = %e, "Failed to destroy session");
                LogoutOutcome::Failed
            }
        }
    }

    /// Remove all expired sessions from the store.
    pub async fn purge_expired(&self) -> Result<u64> {
        let removed = self.store.purge_expired(Utc::now()).await?;
        if removed > 0 {
            debug!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}
