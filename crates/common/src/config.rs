//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ClipdeckError, ClipdeckResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Overlay drawing surface settings.
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Transcode engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Overlay drawing surface parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Backing-store width in pixels.
    pub width: u32,

    /// Backing-store height in pixels.
    pub height: u32,

    /// Width the surface is displayed at (CSS pixels).
    pub display_width: f64,

    /// Displayed height. When absent, derived from the backing-store
    /// aspect ratio (`height: auto`).
    #[serde(default)]
    pub display_height: Option<f64>,

    /// Font size shared by text rendering and text hit-testing.
    pub font_size: f64,

    /// TrueType/OpenType font used for text overlays.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// How a dragged overlay follows the pointer.
    #[serde(default)]
    pub drag_policy: DragPolicy,
}

/// Drag tracking behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPolicy {
    /// Re-center a dragged overlay on the pointer only while the pointer is
    /// still inside the overlay's current box.
    #[default]
    Contained,
    /// Keep the offset captured on press and follow the pointer anywhere.
    Grabbed,
}

/// Transcode engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// ffmpeg executable name or path.
    pub ffmpeg: String,

    /// ffprobe executable name or path.
    pub ffprobe: String,

    /// Parent directory for the engine's private working directory.
    /// Defaults to the system temp directory.
    #[serde(default)]
    pub work_root: Option<PathBuf>,

    /// What happens when a transform is requested while one is running.
    #[serde(default)]
    pub concurrency: ConcurrencyPolicy,
}

/// Single-flight policy for the transcode pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// Fail the second request with a busy error.
    #[default]
    Reject,
    /// Wait until the running transform finishes.
    Queue,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipdeck=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            display_width: 652.444,
            display_height: None,
            font_size: 48.0,
            font_path: None,
            drag_policy: DragPolicy::Contained,
        }
    }
}

impl CanvasConfig {
    /// Displayed height, falling back to the backing-store aspect ratio.
    pub fn effective_display_height(&self) -> f64 {
        self.display_height.unwrap_or_else(|| {
            if self.width == 0 {
                0.0
            } else {
                self.display_width * self.height as f64 / self.width as f64
            }
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            work_root: None,
            concurrency: ConcurrencyPolicy::Reject,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }
        match Self::try_load_from(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "Using default config");
                Self::default()
            }
        }
    }

    /// Load config from `config_path`, reporting unreadable or malformed files.
    pub fn try_load_from(config_path: &Path) -> ClipdeckResult<Self> {
        let content = std::fs::read_to_string(config_path).map_err(|e| {
            ClipdeckError::config(format!("Failed to read {}: {e}", config_path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ClipdeckError::config(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Save config to the standard location.
    pub fn save(&self) -> ClipdeckResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config as pretty JSON at `config_path`.
    pub fn save_to(&self, config_path: &Path) -> ClipdeckResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("clipdeck").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_height_follows_aspect() {
        let canvas = CanvasConfig {
            width: 1920,
            height: 1080,
            display_width: 960.0,
            ..CanvasConfig::default()
        };
        assert!((canvas.effective_display_height() - 540.0).abs() < 1e-9);

        let explicit = CanvasConfig {
            display_height: Some(300.0),
            ..canvas
        };
        assert_eq!(explicit.effective_display_height(), 300.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"engine":{"ffmpeg":"/opt/ffmpeg","ffprobe":"ffprobe","concurrency":"queue"}}"#)
                .unwrap();
        assert_eq!(config.engine.ffmpeg, "/opt/ffmpeg");
        assert_eq!(config.engine.concurrency, ConcurrencyPolicy::Queue);
        assert_eq!(config.canvas.width, 1920);
        assert_eq!(config.canvas.drag_policy, DragPolicy::Contained);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/clipdeck/config.json"));
        assert_eq!(config.canvas.font_size, 48.0);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::try_load_from(&path).unwrap_err();
        assert!(matches!(err, ClipdeckError::Config { .. }), "got {err:?}");
        assert_eq!(AppConfig::load_from(&path).canvas.width, 1920);
    }

    #[test]
    fn test_save_to_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = AppConfig::default();
        config.engine.ffmpeg = "/opt/bin/ffmpeg".to_string();

        config.save_to(&path).unwrap();
        let loaded = AppConfig::try_load_from(&path).unwrap();
        assert_eq!(loaded.engine.ffmpeg, "/opt/bin/ffmpeg");
    }
}
