//! Shared application state for the web handlers.

use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{PasswordError, PasswordHasher, SessionManager};
use crate::config::AuthConfig;
use crate::db::{SessionStore, UserStore};

/// How the session token travels to and from the client.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,
    /// Whether to set the `Secure` attribute.
    pub secure: bool,
}

impl SessionCookie {
    /// Read the session token from the request cookies.
    pub fn token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }

    /// Cookie carrying a freshly issued token.
    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Cookie that clears the token on the client.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User store.
    pub users: Arc<dyn UserStore>,
    /// Password hasher.
    pub hasher: PasswordHasher,
    /// Session manager.
    pub sessions: SessionManager,
    /// Session cookie settings.
    pub cookie: SessionCookie,
}

impl AppState {
    /// Build the state from configuration and the two stores.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            users,
            hasher: PasswordHasher::new(&config.hashing)?,
            sessions: SessionManager::with_ttl(
                sessions,
                Duration::from_secs(config.session_ttl_secs),
            ),
            cookie: SessionCookie {
                name: config.cookie_name.clone(),
                secure: config.cookie_secure,
            },
        })
    }
}
