//! Error types for filedock.

use thiserror::Error;

/// Common error type for filedock.
///
/// Upload rejections are not represented here; see
/// [`UploadError`](crate::file::UploadError) for the upload pipeline.
#[derive(Error, Debug)]
pub enum FiledockError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error (open or pool acquisition).
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

impl From<sqlx::Error> for FiledockError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) {
            FiledockError::DatabaseConnection(e.to_string())
        } else {
            FiledockError::Database(e.to_string())
        }
    }
}

/// Result type alias for filedock operations.
pub type Result<T> = std::result::Result<T, FiledockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = FiledockError::Validation("upload dir is empty".to_string());
        assert_eq!(err.to_string(), "validation error: upload dir is empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = FiledockError::NotFound("file record".to_string());
        assert_eq!(err.to_string(), "file record not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FiledockError = io_err.into();
        assert!(matches!(err, FiledockError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_pool_closed_is_connection_error() {
        let err: FiledockError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, FiledockError::DatabaseConnection(_)));
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err: FiledockError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, FiledockError::Database(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(FiledockError::Config("bad".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
