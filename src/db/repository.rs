//! SQLite-backed user store.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::traits::UserStore;
use super::user::{NewUser, User};
use crate::{KeyholeError, Result};

/// Repository for users in the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, password FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn add(&self, new_user: NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(&new_user.username)
            .bind(new_user.password.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| match KeyholeError::from(e) {
                KeyholeError::Conflict(_) => KeyholeError::Conflict("username".to_string()),
                other => other,
            })?;

        let user_id = result.last_insert_rowid();
        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| KeyholeError::NotFound("user".to_string()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, username, password FROM users WHERE username = ? ORDER BY user_id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
