//! Credential login.

use tracing::{info, warn};

use super::validation::check_username_exists;
use super::{AuthError, Credentials, PasswordHasher, SessionManager};
use crate::db::{User, UserStore};

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// Session token now bound to the user.
    pub token: String,
    /// The authenticated user.
    pub user: User,
    /// Welcome message naming the username as submitted.
    pub message: String,
}

/// Authenticate `credentials` and bind the user to a session.
///
/// An unknown username and a wrong password both fail with
/// [`AuthError::InvalidCredentials`]. `current_token` is the caller's
/// existing session token, if any; it is retired on success.
pub async fn login(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    sessions: &SessionManager,
    current_token: Option<&str>,
    credentials: Credentials,
) -> Result<LoginSuccess, AuthError> {
    let Credentials { username, password } = credentials;

    if let Err(e) = check_username_exists(users, &username).await {
        warn!(username = %username, "Login failed: user not found");
        return Err(e);
    }

    let user = users.find_by_username(&username).await?.into_iter().next();

    let verified = match &user {
        Some(user) => hasher.verify_blocking(password, user.password.clone()).await,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!(username = %username, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let token = sessions.login(current_token, user.clone()).await?;

    info!(username = %username, user_id = user.user_id, "Login successful");

    Ok(LoginSuccess {
        token,
        user,
        message: format!("Welcome {username}!"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::register;
    use crate::config::HashingConfig;
    use crate::db::{MemorySessionStore, MemoryUserStore};
    use std::sync::Arc;

    struct Fixture {
        users: MemoryUserStore,
        hasher: PasswordHasher,
        sessions: SessionManager,
    }

    async fn fixture() -> Fixture {
        let users = MemoryUserStore::new();
        let hasher = PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        register(&users, &hasher, Credentials::new("sue", "1234"))
            .await
            .unwrap();
        Fixture {
            users,
            hasher,
            sessions: SessionManager::new(Arc::new(MemorySessionStore::new())),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let f = fixture().await;

        let success = login(&f.users, &f.hasher, &f.sessions, None, Credentials::new("sue", "1234"))
            .await
            .unwrap();

        assert_eq!(success.message, "Welcome sue!");
        assert_eq!(success.user.username, "sue");
        assert_eq!(
            f.sessions.current_user(&success.token).await.unwrap(),
            Some(success.user)
        );
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_identical() {
        let f = fixture().await;

        let wrong_password =
            login(&f.users, &f.hasher, &f.sessions, None, Credentials::new("sue", "4321")).await;
        let unknown_user =
            login(&f.users, &f.hasher, &f.sessions, None, Credentials::new("bob", "1234")).await;

        assert_eq!(wrong_password.as_ref().unwrap_err(), &AuthError::InvalidCredentials);
        assert_eq!(wrong_password.unwrap_err(), unknown_user.unwrap_err());
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let f = fixture().await;
        let result =
            login(&f.users, &f.hasher, &f.sessions, None, Credentials::new("SUE", "1234")).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_corrupted_stored_hash_fails_verification() {
        let f = fixture().await;
        f.users
            .add(crate::db::NewUser::new(
                "corrupt",
                crate::auth::HashedPassword::from_stored("not-a-phc-string"),
            ))
            .await
            .unwrap();

        let result = login(
            &f.users,
            &f.hasher,
            &f.sessions,
            None,
            Credentials::new("corrupt", "not-a-phc-string"),
        )
        .await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_relogin_retires_previous_token() {
        let f = fixture().await;
        let first = login(&f.users, &f.hasher, &f.sessions, None, Credentials::new("sue", "1234"))
            .await
            .unwrap();

        let second = login(
            &f.users,
            &f.hasher,
            &f.sessions,
            Some(&first.token),
            Credentials::new("sue", "1234"),
        )
        .await
        .unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(f.sessions.current_user(&first.token).await.unwrap(), None);
        assert!(f.sessions.current_user(&second.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let f = fixture().await;
        let first = login(&f.users, &f.hasher, &f.sessions, None, Credentials::new("sue", "1234"))
            .await
            .unwrap();

        let result = login(
            &f.users,
            &f.hasher,
            &f.sessions,
            Some(&first.token),
            Credentials::new("sue", "wrong"),
        )
        .await;

        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
        assert!(f.sessions.current_user(&first.token).await.unwrap().is_some());
    }
}
