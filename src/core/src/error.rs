//! Storage-level error types for RBAC policy objects
//!
//! Every repository implementation reports failures through [`CoreError`]
//! so that callers can tell a missing object apart from an unreadable store.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for policy storage and validation
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object with the same identity already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Object failed validation
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Backing store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        CoreError::NotFound(msg.into())
    }

    /// Create an already exists error
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        CoreError::AlreadyExists(msg.into())
    }

    /// Create an invalid error
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        CoreError::Invalid(msg.into())
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        CoreError::Storage(msg.into())
    }

    /// Whether this error means the object is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}
