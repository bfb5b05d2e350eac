//! Clipdeck Render Engine
//!
//! Rasterizes the overlay set onto the drawing surface. Every mutation
//! redraws from scratch; the current overlay set fully determines the
//! raster.
//!
//! # Pipeline Architecture
//!
//! ```text
//! OverlayStore ──┐
//!                ├── clear (transparent)
//!                │        │
//!                │        ├── rectangles: filled boxes
//!                │        ├── text: glyph runs at the baseline
//!                │        ▼
//!                │   RgbaImage ── snapshot_png ──► filter.png
//! TextMetrics ───┘   (hit-test shares the same metrics)
//! ```

pub mod canvas;
pub mod text;

pub use canvas::*;
pub use text::*;
