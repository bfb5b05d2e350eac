//! Error types shared across Clipdeck crates.

use std::path::PathBuf;

/// Top-level error type for Clipdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipdeckError {
    /// An operation was triggered without something it cannot run without
    /// (source video, drawing surface, known duration).
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Overlay index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("A transform is already in progress")]
    Busy,

    #[error("Transcode failed: {message}")]
    Transcode { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using ClipdeckError.
pub type ClipdeckResult<T> = Result<T, ClipdeckError>;

impl ClipdeckError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: msg.into(),
        }
    }

    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the error was raised before the engine was touched, i.e. the
    /// user can fix the input and retry without side effects.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::Precondition { .. } | Self::InvalidParameter { .. } | Self::IndexOutOfRange { .. }
        )
    }
}
