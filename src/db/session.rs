//! Session record model.

use chrono::{DateTime, Utc};

use super::User;
use crate::{KeyholeError, Result};

/// Server-side session payload stored under an opaque token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Snapshot of the user taken at login. Not re-resolved afterwards.
    pub user: User,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a record for `user` that expires after `ttl`.
    ///
    /// Fails if the expiry falls outside the representable date range.
    pub fn new(user: User, ttl: chrono::Duration) -> Result<Self> {
        let created_at = Utc::now();
        let expires_at = created_at.checked_add_signed(ttl).ok_or_else(|| {
            KeyholeError::SessionStore(format!("session lifetime out of range: {ttl}"))
        })?;
        Ok(Self {
            user,
            created_at,
            expires_at,
        })
    }

    /// Whether the record is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the record has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            user_id: 1,
            username: "sue".to_string(),
            password: "hash".to_string(),
        }
    }

    #[test]
    fn test_new_record_is_live() {
        let record = SessionRecord::new(user(), chrono::Duration::seconds(60)).unwrap();
        assert!(!record.is_expired());
        assert_eq!(record.expires_at - record.created_at, chrono::Duration::seconds(60));
    }

    #[test]
    fn test_record_expires() {
        let record = SessionRecord::new(user(), chrono::Duration::seconds(60)).unwrap();
        let later = record.created_at + chrono::Duration::seconds(61);
        assert!(record.is_expired_at(later));
        assert!(record.is_expired_at(record.expires_at));
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let ttl = chrono::Duration::seconds(1_000_000_000_000_000);
        let result = SessionRecord::new(user(), ttl);
        assert!(matches!(result, Err(KeyholeError::SessionStore(_))));
    }
}
