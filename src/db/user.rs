//! User model for Keyhole.

use crate::auth::HashedPassword;

/// A registered account.
///
/// `password` always holds an Argon2 PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Store-assigned unique ID.
    pub user_id: i64,
    /// Login username (unique, case-sensitive).
    pub username: String,
    /// Password hash.
    pub password: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Password hash produced by [`crate::auth::PasswordHasher`].
    pub password: HashedPassword,
}

impl NewUser {
    /// Create a new user record from a username and an already hashed password.
    pub fn new(username: impl Into<String>, password: HashedPassword) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
