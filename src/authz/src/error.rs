//! Error types for the authorization engine

use rbac_core::CoreError;
use thiserror::Error;

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// A binding references a role that does not exist, or a role of the
    /// wrong kind. The decision is indeterminate.
    #[error("Configuration integrity error: {0}")]
    ConfigurationIntegrity(String),

    /// Repository read/write failure, passed through unchanged
    #[error(transparent)]
    Storage(#[from] CoreError),

    /// Decision request carries neither resource nor non-resource attributes
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_pass_through() {
        let err: AuthzError = CoreError::storage("file unreadable").into();
        assert!(matches!(err, AuthzError::Storage(CoreError::Storage(_))));
        assert_eq!(err.to_string(), "Storage error: file unreadable");
    }

    #[test]
    fn test_error_display() {
        let err = AuthzError::ConfigurationIntegrity("Role 'dev/viewer' not found".into());
        assert_eq!(
            err.to_string(),
            "Configuration integrity error: Role 'dev/viewer' not found"
        );
    }
}
