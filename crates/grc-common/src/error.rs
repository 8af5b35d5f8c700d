//! Error types for the GRC engine

use thiserror::Error;

/// GRC engine error type
///
/// Every variant is recoverable by the caller. The `Display` text is meant to
/// be shown to an end user as-is.
#[derive(Error, Debug)]
pub enum GrcError {
    /// Caller supplied a value the engine cannot accept
    #[error("validation failed: {0}")]
    Validation(String),

    /// Target status is not reachable from the current status
    #[error("cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        /// Status the entity is currently in
        from: String,
        /// Status that was requested
        to: String,
    },

    /// Referenced risk, entity or workflow does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller acted on a stale view of the entity
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Configuration document could not be parsed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GrcError {
    /// Shorthand for a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this is a rejected transition (as opposed to bad input)
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

/// Result type for the GRC engine
pub type GrcResult<T> = Result<T, GrcError>;
