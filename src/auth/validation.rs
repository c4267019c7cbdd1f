//! Credential checks that run before any hashing or mutation.

use thiserror::Error;

use crate::db::UserStore;
use crate::KeyholeError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Authentication protocol errors.
///
/// The `Display` strings of the first three variants are the exact
/// client-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Registration with a username that already exists.
    #[error("Username taken")]
    UsernameTaken,

    /// Registration with a password of three characters or fewer.
    #[error("Password must be longer than 3 chars")]
    PasswordTooShort,

    /// Unknown username or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A store or hashing failure. The detail is for logs only.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl From<KeyholeError> for AuthError {
    fn from(err: KeyholeError) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

/// Succeed only if no user has exactly this username.
pub async fn check_username_free(users: &dyn UserStore, username: &str) -> Result<(), AuthError> {
    if users.find_by_username(username).await?.is_empty() {
        Ok(())
    } else {
        Err(AuthError::UsernameTaken)
    }
}

/// Succeed only if a user with exactly this username exists.
///
/// Fails with the same generic error a wrong password produces.
pub async fn check_username_exists(
    users: &dyn UserStore,
    username: &str,
) -> Result<(), AuthError> {
    if users.find_by_username(username).await?.is_empty() {
        Err(AuthError::InvalidCredentials)
    } else {
        Ok(())
    }
}

/// Succeed only if the password is longer than 3 characters.
///
/// # Examples
///
/// ```
/// use keyhole::auth::{check_password_length, AuthError};
///
/// assert_eq!(check_password_length("123"), Err(AuthError::PasswordTooShort));
/// assert!(check_password_length("1234").is_ok());
/// ```
pub fn check_password_length(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}
