//! User registration for Keyhole.

use tracing::{error, info};

use super::validation::{check_password_length, check_username_free};
use super::{AuthError, Credentials, PasswordHasher};
use crate::db::{NewUser, User, UserStore};
use crate::KeyholeError;

/// Register a new user.
///
/// This function:
/// 1. Checks that the username is free
/// 2. Checks the password length
/// 3. Hashes the password
/// 4. Creates the user in the store
///
/// The checks run before any hashing or write. A unique violation raised
/// by the store on insert is reported as [`AuthError::UsernameTaken`].
pub async fn register(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    credentials: Credentials,
) -> Result<User, AuthError> {
    let Credentials { username, password } = credentials;

    check_username_free(users, &username).await?;
    check_password_length(&password)?;

    let password_hash = hasher.hash_blocking(password).await.map_err(|e| {
        error!(error = %e, "Password hashing failed");
        AuthError::Infrastructure(e.to_string())
    })?;

    let user = match users.add(NewUser::new(&username, password_hash)).await {
        Ok(user) => user,
        Err(KeyholeError::Conflict(_)) => {
            info!(username = %username, "Registration lost a race for username");
            return Err(AuthError::UsernameTaken);
        }
        Err(e) => {
            error!(error = %e, "User creation failed");
            return Err(e.into());
        }
    };

    info!(
        username = %user.username,
        user_id = user.user_id,
        "New user registered"
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashingConfig;
    use crate::db::MemoryUserStore;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let store = MemoryUserStore::new();
        let hasher = hasher();

        let user = register(&store, &hasher, Credentials::new("sue", "1234"))
            .await
            .unwrap();

        assert_eq!(user.username, "sue");
        assert_eq!(user.user_id, 1);
        assert_ne!(user.password, "1234");
        assert!(hasher.verify("1234", &user.password));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let store = MemoryUserStore::new();

        for password in ["", "1", "12", "123"] {
            let result = register(&store, &hasher(), Credentials::new("sue", password)).await;
            assert_eq!(result, Err(AuthError::PasswordTooShort));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_username_taken() {
        let store = MemoryUserStore::new();
        register(&store, &hasher(), Credentials::new("sue", "1234"))
            .await
            .unwrap();

        let result = register(&store, &hasher(), Credentials::new("sue", "abcdef")).await;

        assert_eq!(result, Err(AuthError::UsernameTaken));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_username_check_precedes_password_check() {
        let store = MemoryUserStore::new();
        register(&store, &hasher(), Credentials::new("sue", "1234"))
            .await
            .unwrap();

        let result = register(&store, &hasher(), Credentials::new("sue", "1")).await;
        assert_eq!(result, Err(AuthError::UsernameTaken));
    }
}
