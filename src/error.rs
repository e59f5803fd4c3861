//! Error types for the anima engine.

use thiserror::Error;

/// Failure taxonomy shared by every public engine operation.
#[derive(Error, Debug)]
pub enum AnimaError {
    /// Input rejected before any mutation (out-of-range score, bad content, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// SQLite persistence failure. Surfaced as-is, never retried.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Metadata could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row holds a value the domain types cannot represent.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl AnimaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, AnimaError>;
