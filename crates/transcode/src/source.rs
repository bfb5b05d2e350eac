//! The user-supplied source video.

use std::path::Path;

use clipdeck_common::error::{ClipdeckError, ClipdeckResult};

/// A video loaded into memory, with the duration the player reported.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceVideo {
    /// Original file name, for logging.
    pub name: String,

    /// Raw file contents.
    pub bytes: Vec<u8>,

    /// Duration in seconds, when known.
    pub duration_secs: Option<f64>,
}

impl SourceVideo {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, duration_secs: Option<f64>) -> Self {
        Self {
            name: name.into(),
            bytes,
            duration_secs,
        }
    }

    /// Read a video file from disk.
    pub fn from_path(path: &Path, duration_secs: Option<f64>) -> ClipdeckResult<Self> {
        if !path.exists() {
            return Err(ClipdeckError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes, duration_secs))
    }

    /// Reject videos the engine cannot possibly read.
    pub fn validate(&self) -> ClipdeckResult<()> {
        if self.bytes.is_empty() {
            return Err(ClipdeckError::precondition(format!(
                "Source video {} is empty",
                self.name
            )));
        }
        Ok(())
    }

    /// Duration, required by time-range operations.
    pub fn require_duration(&self) -> ClipdeckResult<f64> {
        match self.duration_secs {
            Some(d) if d.is_finite() && d > 0.0 => Ok(d),
            Some(d) => Err(ClipdeckError::precondition(format!(
                "Source video {} has unusable duration {d}",
                self.name
            ))),
            None => Err(ClipdeckError::precondition(format!(
                "Duration of source video {} is unknown",
                self.name
            ))),
        }
    }
}
