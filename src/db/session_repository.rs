//! SQLite-backed session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::traits::SessionStore;
use super::{SessionRecord, User};
use crate::{KeyholeError, Result};

#[derive(sqlx::FromRow)]
struct SessionRow {
    user_id: i64,
    username: String,
    password: String,
    created_at: i64,
    expires_at: i64,
}

impl TryFrom<SessionRow> for SessionRecord {
    type Error = KeyholeError;

    fn try_from(row: SessionRow) -> Result<Self> {
        let timestamp = |secs: i64| {
            DateTime::<Utc>::from_timestamp(secs, 0)
                .ok_or_else(|| KeyholeError::SessionStore(format!("invalid timestamp {secs}")))
        };

        Ok(SessionRecord {
            user: User {
                user_id: row.user_id,
                username: row.username,
                password: row.password,
            },
            created_at: timestamp(row.created_at)?,
            expires_at: timestamp(row.expires_at)?,
        })
    }
}

/// Repository for sessions in the `sessions` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new SessionRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count stored sessions, expired or not.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT user_id, username, password, created_at, expires_at
             FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionRecord::try_from).transpose()
    }

    async fn set(&self, token: &str, record: SessionRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, username, password, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(token) DO UPDATE SET
                user_id = excluded.user_id,
                username = excluded.username,
                password = excluded.password,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at",
        )
        .bind(token)
        .bind(record.user.user_id)
        .bind(&record.user.username)
        .bind(&record.user.password)
        .bind(record.created_at.timestamp())
        .bind(record.expires_at.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn user(name: &str) -> User {
        User {
            user_id: 7,
            username: name.to_string(),
            password: "$argon2id$fake".to_string(),
        }
    }

    async fn setup() -> (Database, SessionRepository) {
        let db = Database::open_in_memory().await.unwrap();
        let repo = SessionRepository::new(db.pool().clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (_db, repo) = setup().await;
        let record = SessionRecord::new(user("sue"), chrono::Duration::seconds(60)).unwrap();

        repo.set("tok", record.clone()).await.unwrap();
        let loaded = repo.get("tok").await.unwrap().unwrap();

        assert_eq!(loaded.user, record.user);
        assert_eq!(loaded.expires_at.timestamp(), record.expires_at.timestamp());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (_db, repo) = setup().await;
        assert!(repo.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (_db, repo) = setup().await;

        repo.set("tok", SessionRecord::new(user("sue"), chrono::Duration::seconds(60)).unwrap())
            .await
            .unwrap();
        repo.set("tok", SessionRecord::new(user("bob"), chrono::Duration::seconds(60)).unwrap())
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.get("tok").await.unwrap().unwrap().user.username, "bob");
    }

    #[tokio::test]
    async fn test_destroy() {
        let (_db, repo) = setup().await;
        repo.set("tok", SessionRecord::new(user("sue"), chrono::Duration::seconds(60)).unwrap())
            .await
            .unwrap();

        assert!(repo.destroy("tok").await.unwrap());
        assert!(!repo.destroy("tok").await.unwrap());
        assert!(repo.get("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (_db, repo) = setup().await;
        repo.set("old", SessionRecord::new(user("sue"), chrono::Duration::seconds(-10)).unwrap())
            .await
            .unwrap();
        repo.set("new", SessionRecord::new(user("bob"), chrono::Duration::seconds(600)).unwrap())
            .await
            .unwrap();

        let removed = repo.purge_expired(Utc::now()).await.unwrap();

        assert_eq!(removed, 1);
        assert!(repo.get("old").await.unwrap().is_none());
        assert!(repo.get("new").await.unwrap().is_some());
    }
}
