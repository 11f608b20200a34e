//! Error handling for txcompare-store
//!
//! Wraps txcompare-core ExError with store-specific helpers

use std::path::Path;
use txcompare_core::errors::{ExError, ExErrorKind, TxCompareError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a missing job file error
pub fn missing_job_file(path: &Path) -> ExError {
    ExError::from(TxCompareError::MissingJobFile {
        path: path.display().to_string(),
    })
}

/// Create a serialization error for a named output
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// I/O failure reported through the core error type, for code running
/// inside the streaming loop.
pub(crate) fn stream_io(operation: &str, err: std::io::Error) -> TxCompareError {
    TxCompareError::Io {
        op: operation.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_job_file_is_not_found() {
        let err = missing_job_file(Path::new("jobs/a/comparison.ndjson"));
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert!(err.message().contains("jobs/a/comparison.ndjson"));
    }

    #[test]
    fn test_io_error_carries_op() {
        let err = io_error(
            "open_input",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.code(), "ERR_IO");
        assert_eq!(err.op(), Some("open_input"));
    }
}
