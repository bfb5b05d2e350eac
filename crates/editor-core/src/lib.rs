//! Clipdeck Editor Core
//!
//! The shell-facing overlay editor. An [`EditorSession`] owns the overlay
//! store and the drawing surface, turns pointer gestures into store
//! mutations through the [`DragController`], and hands canvas snapshots to
//! the transcode pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                EditorSession                  │
//! │  pointer ──► DragController ──► OverlayStore  │
//! │                                     │         │
//! │                                     ▼         │
//! │                              DrawSurface      │
//! │                          (redraw, snapshot)   │
//! │                                     │         │
//! │  SourceVideo ───────────────┐       │ PNG     │
//! │                             ▼       ▼         │
//! │                     TranscodePipeline ──► Artifact
//! └──────────────────────────────────────────────┘
//! ```

pub mod drag;
pub mod playback;
pub mod session;

pub use drag::*;
pub use playback::PlaybackWindow;
pub use session::*;
