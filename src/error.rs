//! Error types for the Flitro workspace context manager.

use thiserror::Error;

/// Failures at the OS automation boundary (scripting host, process control, file opening).
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Failed to start automation host: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Automation script failed (code {code:?}): {message}")]
    ScriptFailed { code: Option<i32>, message: String },

    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("Application not running: {0}")]
    NotRunning(String),

    #[error("Object no longer exists: {0}")]
    NoSuchObject(String),

    #[error("Unexpected automation output: {0}")]
    UnexpectedOutput(String),
}

impl AutomationError {
    /// True when the error means the target already vanished.
    ///
    /// Close paths swallow these: a window the user closed by hand is not a failure.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            AutomationError::NotRunning(_) | AutomationError::NoSuchObject(_)
        )
    }
}

/// Persistence errors for the context store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to encode contexts: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No storage location available: {0}")]
    NoLocation(String),
}

/// Surface errors for library and CLI operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Context not found: {0}")]
    ContextNotFound(String),

    #[error("Context name '{0}' matches more than one context; use its id instead")]
    AmbiguousContext(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Automation error: {0}")]
    AutomationError(#[from] AutomationError),

    #[error("Interaction failed: {0}")]
    Interaction(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
