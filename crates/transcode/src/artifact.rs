//! Transform results.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clipdeck_common::error::ClipdeckResult;

use crate::operation::OperationKind;

/// Output media of one transform, ready for preview or download.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// The transform that produced it.
    pub kind: OperationKind,

    /// `video/mp4` or `image/gif`.
    pub mime: &'static str,

    /// Filename offered for download.
    pub suggested_filename: &'static str,

    /// Encoded media.
    pub bytes: Vec<u8>,

    /// When the transform finished.
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    pub fn new(kind: OperationKind, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            mime: kind.mime(),
            suggested_filename: kind.download_name(),
            bytes,
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact to an explicit path.
    pub fn save_to(&self, path: &Path) -> ClipdeckResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), mime = self.mime, "Saved artifact");
        Ok(())
    }

    /// Write the artifact into `dir` under its suggested filename.
    pub fn save_in_dir(&self, dir: &Path) -> ClipdeckResult<PathBuf> {
        let path = dir.join(self.suggested_filename);
        self.save_to(&path)?;
        Ok(path)
    }
}
