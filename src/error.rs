//! Error types for the viewport core.
//!
//! The coordination paths themselves have no recoverable errors:
//! interruption is reported through `completion(false)` and a state that
//! cannot yet compute a camera simply emits nothing. What remains fallible
//! is the configuration surface: option validation and decoding a style's
//! default camera.

use thiserror::Error;

/// Main error type for viewport operations.
#[derive(Debug, Error)]
pub enum ViewportError {
    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("overview geometry is empty")]
    EmptyGeometry,

    #[error("style default camera: {0}")]
    StyleCamera(String),
}

impl From<serde_json::Error> for ViewportError {
    fn from(e: serde_json::Error) -> Self {
        ViewportError::StyleCamera(e.to_string())
    }
}

/// Result type for viewport operations.
pub type Result<T> = std::result::Result<T, ViewportError>;
