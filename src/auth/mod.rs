//! Authentication module for Keyhole.
//!
//! This module provides credential validation, password hashing,
//! session management, and the registration and login protocols.

mod credentials;
mod login;
mod password;
mod registration;
mod session;
pub mod validation;

pub use credentials::Credentials;
pub use login::{login, LoginSuccess};
pub use password::{HashedPassword, PasswordError, PasswordHasher};
pub use registration::register;
pub use session::{LogoutOutcome, SessionManager, DEFAULT_SESSION_TTL_SECS};
pub use validation::{
    check_password_length, check_username_exists, check_username_free, AuthError,
    MIN_PASSWORD_LENGTH,
};
