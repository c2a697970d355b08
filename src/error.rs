//! Error types for folio.

use thiserror::Error;

/// Common error type for process-level failures.
///
/// Request-scoped failures (validation, dispatch, upstream) have their own
/// types and never surface as `FolioError`.
#[derive(Error, Debug)]
pub enum FolioError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client construction or upstream error.
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = FolioError::Config("port out of range".to_string());
        assert_eq!(err.to_string(), "configuration error: port out of range");
    }

    #[test]
    fn test_http_error_display() {
        let err = FolioError::Http("builder failed".to_string());
        assert_eq!(err.to_string(), "HTTP client error: builder failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FolioError = io_err.into();
        assert!(matches!(err, FolioError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(FolioError::Config("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
