//! Clip-transform operations and their engine commands.

use std::fmt;

use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use serde::{Deserialize, Serialize};

/// Staged name of the source video.
pub const INPUT_FILE: &str = "input.mp4";

/// Staged name of the overlay snapshot.
pub const FILTER_FILE: &str = "filter.png";

/// Output name for video results.
pub const VIDEO_OUTPUT_FILE: &str = "output.mp4";

/// Output name for GIF results.
pub const GIF_OUTPUT_FILE: &str = "output.gif";

/// Full scale of the range sliders.
pub const SLIDER_MAX: f64 = 100.0;

/// Which transform an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Overlay,
    Trim,
    Gif,
    Resize,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::Trim => "trim",
            Self::Gif => "gif",
            Self::Resize => "resize",
        }
    }

    /// MIME type of the produced artifact.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Overlay | Self::Trim | Self::Resize => "video/mp4",
        }
    }

    /// Name of the output file inside the engine filesystem.
    pub fn output_file(self) -> &'static str {
        match self {
            Self::Gif => GIF_OUTPUT_FILE,
            Self::Overlay | Self::Trim | Self::Resize => VIDEO_OUTPUT_FILE,
        }
    }

    /// Filename suggested when the user downloads the artifact.
    pub fn download_name(self) -> &'static str {
        match self {
            Self::Overlay => "overlay.mp4",
            Self::Trim => "clip.mp4",
            Self::Gif => "clip.gif",
            Self::Resize => "resized.mp4",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `[start, end)` time range in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl ClipRange {
    /// Build a range, requiring `0 <= start < end`.
    pub fn new(start_secs: f64, end_secs: f64) -> ClipdeckResult<Self> {
        if !start_secs.is_finite() || !end_secs.is_finite() {
            return Err(ClipdeckError::invalid_parameter(format!(
                "Clip range must be finite, got {start_secs}..{end_secs}"
            )));
        }
        if start_secs < 0.0 {
            return Err(ClipdeckError::invalid_parameter(format!(
                "Clip start must not be negative, got {start_secs}"
            )));
        }
        if quantize_secs(start_secs) >= quantize_secs(end_secs) {
            return Err(ClipdeckError::invalid_parameter(format!(
                "Clip start ({start_secs}s) must be before end ({end_secs}s) at microsecond resolution"
            )));
        }
        Ok(Self {
            start_secs,
            end_secs,
        })
    }

    /// Map slider positions (`0..=100`) onto a video of `duration_secs`.
    pub fn from_slider(values: [f64; 2], duration_secs: f64) -> ClipdeckResult<Self> {
        for v in values {
            if !(0.0..=SLIDER_MAX).contains(&v) {
                return Err(ClipdeckError::invalid_parameter(format!(
                    "Slider value {v} outside 0..={SLIDER_MAX}"
                )));
            }
        }
        Self::new(
            slider_to_time(duration_secs, values[0]),
            slider_to_time(duration_secs, values[1]),
        )
    }

    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_secs && t <= self.end_secs
    }
}

/// Slider position to video time: `value / 100 * duration`.
pub fn slider_to_time(duration_secs: f64, value: f64) -> f64 {
    value / SLIDER_MAX * duration_secs
}

/// Explicit output size for the scale filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeDimensions {
    pub width: u32,
    pub height: u32,
}

impl ResizeDimensions {
    pub fn new(width: u32, height: u32) -> ClipdeckResult<Self> {
        if width == 0 || height == 0 {
            return Err(ClipdeckError::invalid_parameter(format!(
                "Resize dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Parse width/height as typed into text fields.
    pub fn parse(width: &str, height: &str) -> ClipdeckResult<Self> {
        let field = |name: &str, raw: &str| {
            raw.trim().parse::<u32>().map_err(|_| {
                ClipdeckError::invalid_parameter(format!(
                    "Resize {name} must be a positive integer, got {raw:?}"
                ))
            })
        };
        Self::new(field("width", width)?, field("height", height)?)
    }
}

/// One clip transform with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOperation {
    /// Composite a PNG snapshot of the overlay canvas at `0:0`.
    Overlay { snapshot_png: Vec<u8> },
    /// Stream-copy the range without re-encoding.
    Trim(ClipRange),
    /// Transcode the range to GIF.
    Gif(ClipRange),
    /// Scale to explicit dimensions.
    Resize(ResizeDimensions),
}

impl ClipOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Overlay { .. } => OperationKind::Overlay,
            Self::Trim(_) => OperationKind::Trim,
            Self::Gif(_) => OperationKind::Gif,
            Self::Resize(_) => OperationKind::Resize,
        }
    }

    /// Local checks run before the engine is touched.
    pub fn validate(&self) -> ClipdeckResult<()> {
        match self {
            Self::Overlay { snapshot_png } if snapshot_png.is_empty() => Err(
                ClipdeckError::precondition("Overlay snapshot is empty; nothing to composite"),
            ),
            Self::Trim(range) | Self::Gif(range) => {
                ClipRange::new(range.start_secs, range.end_secs).map(|_| ())
            }
            Self::Resize(dims) => ResizeDimensions::new(dims.width, dims.height).map(|_| ()),
            Self::Overlay { .. } => Ok(()),
        }
    }

    /// Inputs staged in addition to the source video.
    pub fn extra_inputs(&self) -> Vec<(&'static str, &[u8])> {
        match self {
            Self::Overlay { snapshot_png } => vec![(FILTER_FILE, snapshot_png.as_slice())],
            _ => Vec::new(),
        }
    }

    /// Arguments of the single transform command.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec!["-i".to_string(), INPUT_FILE.to_string()];
        match self {
            Self::Overlay { .. } => {
                args.extend(
                    ["-i", FILTER_FILE, "-filter_complex", "overlay=0:0"].map(String::from),
                );
            }
            Self::Trim(range) => {
                args.extend(range_args(range));
                args.extend(["-c", "copy"].map(String::from));
            }
            Self::Gif(range) => {
                args.extend(range_args(range));
                args.extend(["-f", "gif"].map(String::from));
            }
            Self::Resize(dims) => {
                args.push("-vf".to_string());
                args.push(format!("scale={}:{}", dims.width, dims.height));
            }
        }
        args.push(self.kind().output_file().to_string());
        args
    }
}

fn range_args(range: &ClipRange) -> [String; 4] {
    [
        "-ss".to_string(),
        format_secs(range.start_secs),
        "-to".to_string(),
        format_secs(range.end_secs),
    ]
}

/// Seconds as ffmpeg accepts them, at microsecond resolution.
fn format_secs(secs: f64) -> String {
    let fixed = format!("{:.6}", quantize_secs(secs));
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Round to the microsecond, the finest time ffmpeg's duration syntax keeps.
fn quantize_secs(secs: f64) -> f64 {
    (secs * 1_000_000.0).round() / 1_000_000.0
}
