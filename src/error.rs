//! Error types for the back-office service.

use thiserror::Error;

/// Common error type for the back-office service.
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant automatically.
    #[error("database error: {0}")]
    Database(String),

    /// A uniqueness constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BackofficeError {
    fn from(e: sqlx::Error) -> Self {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            BackofficeError::Duplicate(e.to_string())
        } else {
            BackofficeError::Database(e.to_string())
        }
    }
}

/// Result type alias for back-office operations.
pub type Result<T> = std::result::Result<T, BackofficeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = BackofficeError::Validation("username too long".to_string());
        assert_eq!(err.to_string(), "validation error: username too long");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BackofficeError::NotFound("administrator".to_string());
        assert_eq!(err.to_string(), "administrator not found");
    }

    #[test]
    fn test_config_error_display() {
        let err = BackofficeError::Config("missing secret".to_string());
        assert_eq!(err.to_string(), "configuration error: missing secret");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackofficeError = io_err.into();
        assert!(matches!(err, BackofficeError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_duplicate_error_display() {
        let err = BackofficeError::Duplicate("admins.username".to_string());
        assert_eq!(err.to_string(), "duplicate record: admins.username");
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: BackofficeError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, BackofficeError::Database(_)));
    }
}
