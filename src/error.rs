//! Error types for Keyhole.

use thiserror::Error;

/// Common error type for Keyhole.
#[derive(Error, Debug)]
pub enum KeyholeError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// A uniqueness constraint rejected the write.
    #[error("{0} already exists")]
    Conflict(String),

    /// Session store error.
    #[error("session store error: {0}")]
    SessionStore(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for KeyholeError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                KeyholeError::Conflict(db_err.message().to_string())
            }
            _ => KeyholeError::Database(e.to_string()),
        }
    }
}

/// Result type alias for Keyhole operations.
pub type Result<T> = std::result::Result<T, KeyholeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_error_display() {
        let err = KeyholeError::Conflict("username".to_string());
        assert_eq!(err.to_string(), "username already exists");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = KeyholeError::NotFound("user".to_string());
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KeyholeError = io_err.into();
        assert!(matches!(err, KeyholeError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_row_not_found_is_database_error() {
        let err: KeyholeError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, KeyholeError::Database(_)));
    }
}
