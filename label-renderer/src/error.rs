//! Renderer error types.

use label_core::LabelError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering or exporting a label.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Icon file could not be read or decoded.
    #[error("Icon '{path}' is unreadable: {reason}")]
    AssetUnreadable {
        /// Path of the icon.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// Layout rejected the inputs.
    #[error(transparent)]
    Layout(#[from] LabelError),

    /// No usable font.
    #[error("Font unavailable: {0}")]
    Font(String),

    /// Pixel buffer could not be created or drawn.
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// Encoding or writing the exported image failed.
    #[error("Export failed: {0}")]
    Export(String),
}
