//! Password hashing and verification for Keyhole.
//!
//! Uses Argon2id. Hashes are PHC strings carrying their own salt and cost
//! parameters, so verification never depends on the current configuration.

use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

use crate::config::HashingConfig;

/// Password hashing errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// The configured cost parameters are not accepted by Argon2.
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// The blocking hashing task did not complete.
    #[error("hashing task failed: {0}")]
    Task(String),
}

/// A stored password hash. Never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash string read back from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the PHC string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// Salted, cost-configurable password hasher.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl PasswordHasher {
    /// Create a hasher with the given Argon2id cost.
    pub fn new(config: &HashingConfig) -> Result<Self, PasswordError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// The same input hashes differently on every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyhole::auth::PasswordHasher;
    /// use keyhole::config::HashingConfig;
    ///
    /// let hasher = PasswordHasher::new(&HashingConfig::default()).unwrap();
    /// let hash = hasher.hash("1234").unwrap();
    /// assert!(hash.as_str().starts_with("$argon2id$"));
    /// assert!(hasher.verify("1234", hash.as_str()));
    /// ```
    pub fn hash(&self, plaintext: &str) -> Result<HashedPassword, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(HashedPassword(hash.to_string()))
    }

    /// Verify a plaintext candidate against a stored hash.
    ///
    /// Uses the salt and parameters embedded in `stored`; the digest
    /// comparison is constant-time. A malformed `stored` value is a
    /// verification failure, not an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("Stored password hash is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<HashedPassword, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    ///
    /// A task failure counts as a failed verification.
    pub async fn verify_blocking(&self, plaintext: String, stored: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}
