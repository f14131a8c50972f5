use super::{StorageError, TemporalError};

/// Top-level error type for the annotrack record store.
/// All subsystem errors convert into this via `From` impls.
///
/// "No version valid at this time" is not an error: `read`, `update` and
/// `delete` report it as `None`.
#[derive(Debug, thiserror::Error)]
pub enum AnnotrackError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("temporal error: {0}")]
    TemporalError(#[from] TemporalError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl AnnotrackError {
    /// Shorthand for payload validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// True for failures of the persistence layer (the ones a caller maps to a 5xx).
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }

    /// True when a bounded writer wait expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::StorageError(StorageError::LockTimeout { .. }))
    }
}

/// Convenience type alias.
pub type AnnotrackResult<T> = Result<T, AnnotrackError>;
