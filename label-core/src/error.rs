//! Error types for label operations.

use thiserror::Error;

/// Result type for label operations.
pub type LabelResult<T> = Result<T, LabelError>;

/// Errors that can occur while planning a label.
#[derive(Debug, Error)]
pub enum LabelError {
    /// Icon cannot be laid out (zero natural height).
    #[error("Invalid icon asset '{icon}': {reason}")]
    InvalidAsset {
        /// Name of the offending icon.
        icon: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Preset source missing or malformed.
    #[error("Preset configuration error: {0}")]
    Config(String),

    /// Preset serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a preset source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
