//! Configuration module for Keyhole.

use serde::Deserialize;
use std::path::Path;

use crate::{KeyholeError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/keyhole.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file written alongside stdout. Stdout only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Time cost (iterations).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19456 // 19 MiB
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Where session records are kept.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process memory; sessions are lost on restart.
    #[default]
    Memory,
    /// The `sessions` table of the configured database.
    Sqlite,
}

/// Authentication and session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Absolute session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the session cookie carries the `Secure` attribute.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Interval between expired-session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub session_cleanup_interval_secs: u64,
    /// Session storage backend.
    #[serde(default)]
    pub session_backend: SessionBackend,
    /// Password hashing cost.
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Longest accepted session lifetime (10 years).
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn default_session_ttl() -> u64 {
    60 * 60 // 1 hour
}

fn default_cookie_name() -> String {
    "chocolatechip".to_string()
}

fn default_cleanup_interval() -> u64 {
    600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            session_cleanup_interval_secs: default_cleanup_interval(),
            session_backend: SessionBackend::default(),
            hashing: HashingConfig::default(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(KeyholeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| KeyholeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `KEYHOLE_DATABASE_PATH`: Override the database path
    /// - `KEYHOLE_COOKIE_SECURE`: `true`/`1` marks the session cookie `Secure`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("KEYHOLE_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(secure) = std::env::var("KEYHOLE_COOKIE_SECURE") {
            self.auth.cookie_secure = matches!(secure.to_lowercase().as_str(), "1" | "true");
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.auth.cookie_name.is_empty() {
            return Err(KeyholeError::Config("auth.cookie_name must not be empty".into()));
        }
        if self.auth.session_ttl_secs == 0 {
            return Err(KeyholeError::Config(
                "auth.session_ttl_secs must be greater than zero".into(),
            ));
        }
        if self.auth.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(KeyholeError::Config(format!(
                "auth.session_ttl_secs must be at most {MAX_SESSION_TTL_SECS}"
            )));
        }
        if self.auth.session_cleanup_interval_secs == 0 {
            return Err(KeyholeError::Config(
                "auth.session_cleanup_interval_secs must be greater than zero".into(),
            ));
        }
        let hashing = &self.auth.hashing;
        if hashing.iterations == 0 || hashing.parallelism == 0 {
            return Err(KeyholeError::Config(
                "auth.hashing iterations and parallelism must be at least 1".into(),
            ));
        }
        if hashing.memory_kib < 8 * hashing.parallelism {
            return Err(KeyholeError::Config(
                "auth.hashing.memory_kib must be at least 8 * parallelism".into(),
            ));
        }
        Ok(())
    }
}
