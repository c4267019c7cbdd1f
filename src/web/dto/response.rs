//! Response DTOs for the Keyhole web surface.

use serde::Serialize;

use crate::db::User;

/// `{"message": ...}` body used by login, logout and every error.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Create a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Registration result. Never carries the password or its hash.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Store-assigned user ID.
    pub user_id: i64,
    /// Registered username.
    pub username: String,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
        }
    }
}
