//! Clipdeck Transcode Pipeline
//!
//! Every clip transform (overlay, trim, GIF, resize) runs through the same
//! single-flight pipeline against the engine's private filesystem:
//!
//! ```text
//! source video ──┐
//!                ├── stage input.mp4 (+ filter.png for overlays)
//! parameters ────┘         │
//!                          ├── run one ffmpeg command
//!                          │        │
//!                          │        ├── read output.{mp4,gif}
//!                          │        ▼
//!                          └──► Artifact (bytes + MIME + filename)
//! ```

pub mod artifact;
pub mod engine;
pub mod operation;
pub mod pipeline;
pub mod probe;
pub mod source;

pub use artifact::Artifact;
pub use engine::{FfmpegEngine, TranscodeEngine};
pub use operation::*;
pub use pipeline::*;
pub use source::SourceVideo;
