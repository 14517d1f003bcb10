//! Error handling module for the portal data core.
//!
//! Provides a centralized error type with stable error codes. Nothing here is
//! fatal to the application: remote failures degrade to the local cache,
//! storage failures leave the in-memory working copy intact, and import
//! failures are reported once per file.

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const REMOTE_ERROR: &str = "REMOTE_ERROR";
    pub const IMPORT_ERROR: &str = "IMPORT_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Local cache read/write failure (disk full, serialization error).
    /// The caller's in-memory copy is still valid.
    Storage(String),
    /// Remote mirror failure, surfaced only from explicit manual sync.
    Remote(String),
    /// Malformed import file.
    Import(String),
    /// Validation error at a record boundary.
    Validation(String),
    /// Resource not found within a working collection.
    NotFound(String),
    /// Operation requires the admin role.
    Unauthorized(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Remote(_) => codes::REMOTE_ERROR,
            AppError::Import(_) => codes::IMPORT_ERROR,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Storage(msg)
            | AppError::Remote(msg)
            | AppError::Import(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage I/O error: {:?}", err);
        AppError::Storage(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Storage(format!("JSON error: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        tracing::error!("Import parse error: {:?}", err);
        AppError::Import(format!("Import parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = AppError::Remote("cloud unreachable".to_string());
        assert_eq!(err.to_string(), "REMOTE_ERROR: cloud unreachable");
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::other("disk full");
        let err = AppError::from(io);
        assert_eq!(err.error_code(), codes::STORAGE_ERROR);
    }

    #[test]
    fn test_code_and_message_accessors() {
        let err = AppError::Import("bad file".to_string());
        assert_eq!(err.error_code(), codes::IMPORT_ERROR);
        assert_eq!(err.message(), "bad file");
    }
}
