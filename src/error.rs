//! Custom error types for Tidrapport
//!
//! One error enum covers the whole crate. Storage failures carry a
//! human-readable message; the backup layer wraps store errors in
//! [`TidrapportError::Backup`] so callers can tell which layer failed.

use thiserror::Error;

/// The main error type for Tidrapport operations
#[derive(Error, Debug)]
pub enum TidrapportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors (write, read or delete failed at the storage medium)
    #[error("I/O error: {0}")]
    Io(String),

    /// Entries or settings could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored content could not be decoded
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// A backup operation failed in the snapshot store
    #[error("Backup failed: {0}")]
    Backup(#[source] Box<TidrapportError>),
}

impl TidrapportError {
    /// Create a "not found" error for snapshot files
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for time entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Time entry",
            identifier: identifier.into(),
        }
    }

    /// Wrap a store error as a backup failure
    pub fn backup(source: TidrapportError) -> Self {
        Self::Backup(Box::new(source))
    }

    /// Check if this is a "not found" error, looking through backup wrapping
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Backup(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    /// Check if this is a corrupt data error, looking through backup wrapping
    pub fn is_corrupt(&self) -> bool {
        match self {
            Self::CorruptData(_) => true,
            Self::Backup(inner) => inner.is_corrupt(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for TidrapportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TidrapportError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.to_string())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Result type alias for Tidrapport operations
pub type TidrapportResult<T> = Result<T, TidrapportError>;
