//! The external media engine boundary.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;

use clipdeck_common::config::EngineConfig;
use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use tokio::process::Command;

/// An engine that runs one transform command at a time against a private,
/// flat file namespace.
#[async_trait::async_trait]
pub trait TranscodeEngine: Send + Sync {
    /// Store `bytes` under `name` in the engine's filesystem.
    async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()>;

    /// Read the file stored under `name`.
    async fn read_file(&self, name: &str) -> ClipdeckResult<Vec<u8>>;

    /// Remove `name` if present. Missing files are not an error.
    async fn remove_file(&self, name: &str) -> ClipdeckResult<()>;

    /// Execute one transform command. Fails if the command fails.
    async fn run(&self, args: &[String]) -> ClipdeckResult<()>;

    /// Check if the engine can run on this system.
    fn is_available(&self) -> bool;

    /// Engine name for logging.
    fn name(&self) -> &str;
}

/// ffmpeg running in a private temporary working directory.
///
/// The working directory plays the role of the engine's virtual filesystem:
/// staged inputs and outputs live there under plain file names, and the
/// directory is removed when the engine is dropped.
pub struct FfmpegEngine {
    binary: String,
    workdir: tempfile::TempDir,
}

impl FfmpegEngine {
    pub fn new(config: &EngineConfig) -> ClipdeckResult<Self> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("clipdeck-");
            b
        };
        let workdir = match &config.work_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        tracing::debug!(workdir = %workdir.path().display(), binary = %config.ffmpeg, "Engine workspace created");
        Ok(Self {
            binary: config.ffmpeg.clone(),
            workdir,
        })
    }

    /// The private working directory.
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    fn resolve(&self, name: &str) -> ClipdeckResult<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.workdir.path().join(name)),
            _ => Err(ClipdeckError::invalid_parameter(format!(
                "Engine file names must be plain names, got {name:?}"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(name, bytes = bytes.len(), "Staged engine input");
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ClipdeckResult<Vec<u8>> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ClipdeckError::transcode(format!("Engine produced no {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_file(&self, name: &str) -> ClipdeckResult<()> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn run(&self, args: &[String]) -> ClipdeckResult<()> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let start = std::time::Instant::now();

        let output = Command::new(&self.binary)
            .args(["-y", "-hide_banner", "-nostdin", "-loglevel", "error"])
            .args(args)
            .current_dir(self.workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ClipdeckError::transcode(format!("Failed to start {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipdeckError::transcode(format!(
                "ffmpeg failed (status {}): {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            "ffmpeg command finished"
        );
        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Whether `binary -version` runs successfully.
pub fn command_exists(binary: &str) -> bool {
    std::process::Command::new(binary)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
