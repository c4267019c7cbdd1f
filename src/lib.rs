//! Keyhole - session-based credential authentication
//!
//! Registers users with salted password hashes, verifies logins and keeps
//! a server-side session per client, served over a small JSON API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    check_password_length, check_username_exists, check_username_free, login, register,
    AuthError, Credentials, HashedPassword, LoginSuccess, LogoutOutcome, PasswordError,
    PasswordHasher, SessionManager, MIN_PASSWORD_LENGTH,
};
pub use config::{Config, SessionBackend};
pub use db::{
    Database, MemorySessionStore, MemoryUserStore, NewUser, SessionRecord, SessionRepository,
    SessionStore, User, UserRepository, UserStore,
};
pub use error::{KeyholeError, Result};
pub use web::{AppState, WebServer};
