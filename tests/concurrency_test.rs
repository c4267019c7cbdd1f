//! Concurrency tests for Keyhole.
//!
//! Racing registrations for one username must produce exactly one account,
//! and racing logouts of one session must destroy it exactly once.

use std::sync::Arc;

use keyhole::config::HashingConfig;
use keyhole::{
    register, AuthError, Credentials, Database, LogoutOutcome, MemorySessionStore,
    MemoryUserStore, PasswordHasher, SessionManager, SessionRepository, SessionStore, User,
    UserRepository, UserStore,
};

const RACERS: usize = 8;

fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(&HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

async fn race_registrations(users: Arc<dyn UserStore>) {
    let hasher = test_hasher();

    let mut handles = Vec::new();
    for i in 0..RACERS {
        let users = Arc::clone(&users);
        let hasher = hasher.clone();
        handles.push(tokio::spawn(async move {
            let credentials = Credentials::new("sue", format!("password{i}"));
            register(users.as_ref(), &hasher, credentials).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(user) => {
                assert_eq!(user.username, "sue");
                created += 1;
            }
            Err(e) => assert_eq!(e, AuthError::UsernameTaken),
        }
    }

    assert_eq!(created, 1, "Exactly one registration should win");
    assert_eq!(users.find_by_username("sue").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_registration_memory_store() {
    race_registrations(Arc::new(MemoryUserStore::new())).await;
}

#[tokio::test]
async fn test_concurrent_registration_sqlite_store() {
    let db = Database::open_in_memory().await.unwrap();
    race_registrations(Arc::new(UserRepository::new(db.pool().clone()))).await;
}

async fn race_logouts(store: Arc<dyn SessionStore>) {
    let sessions = SessionManager::new(store);
    let user = User {
        user_id: 1,
        username: "sue".to_string(),
        password: "$argon2id$fake".to_string(),
    };
    let token = sessions.login(None, user).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..RACERS {
        let sessions = sessions.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            sessions.logout(Some(token.as_str())).await
        }));
    }

    let mut logged_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            LogoutOutcome::LoggedOut => logged_out += 1,
            LogoutOutcome::NoSession => {}
            LogoutOutcome::Failed => panic!("logout should not fail"),
        }
    }

    assert_eq!(logged_out, 1, "Exactly one logout should destroy the session");
}

#[tokio::test]
async fn test_concurrent_logout_memory_store() {
    race_logouts(Arc::new(MemorySessionStore::new())).await;
}

#[tokio::test]
async fn test_concurrent_logout_sqlite_store() {
    let db = Database::open_in_memory().await.unwrap();
    race_logouts(Arc::new(SessionRepository::new(db.pool().clone()))).await;
}
