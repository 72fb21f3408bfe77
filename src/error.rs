//! Error types for Loops
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Loops
#[derive(Debug, Error)]
pub enum LoopsError {
    /// Loop content was empty after trimming
    #[error("Loop content must not be empty")]
    EmptyContent,

    /// Tag is not part of the tag catalog
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Energy level outside 1-5
    #[error("Invalid energy level: {0} (expected 1-5)")]
    InvalidEnergyLevel(u8),

    /// ID prefix matches more than one loop
    #[error("Ambiguous loop id '{prefix}' matches {count} loops")]
    AmbiguousId { prefix: String, count: usize },

    /// Storage key cannot be mapped onto the backend
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Write would exceed the storage quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Loops operations
pub type Result<T> = std::result::Result<T, LoopsError>;
