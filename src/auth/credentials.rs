//! Submitted credentials.

use std::fmt;

use serde::Deserialize;

/// A username/password pair as submitted by a client.
///
/// Request-scoped only: never persisted, and `Debug` never prints the password.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Create credentials from a username and plaintext password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("sue", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("sue"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_deserialize() {
        let creds: Credentials =
            serde_json::from_str(r#"{"username":"sue","password":"1234"}"#).unwrap();
        assert_eq!(creds.username, "sue");
        assert_eq!(creds.password, "1234");
    }
}
