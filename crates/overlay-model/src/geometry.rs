//! Points, canvas coordinate conversion, and the text measurement seam.
//!
//! The drawing surface has a backing store (`width` x `height` pixels) that is
//! displayed at a different size. Pointer events arrive in display space and
//! must be scaled into backing-store space before hit-testing.

use clipdeck_common::config::CanvasConfig;
use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use serde::{Deserialize, Serialize};

/// A 2D point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where the surface sits on screen, in display (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The drawing surface: backing-store size plus its on-screen placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpace {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub display: DisplayRect,
}

impl CanvasSpace {
    /// Create a canvas space, rejecting degenerate sizes.
    pub fn new(pixel_width: u32, pixel_height: u32, display: DisplayRect) -> ClipdeckResult<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(ClipdeckError::precondition(format!(
                "Drawing surface has no pixels ({pixel_width}x{pixel_height})"
            )));
        }
        if !(display.width > 0.0 && display.height > 0.0)
            || !display.width.is_finite()
            || !display.height.is_finite()
        {
            return Err(ClipdeckError::precondition(format!(
                "Drawing surface has no displayed size ({}x{})",
                display.width, display.height
            )));
        }
        Ok(Self {
            pixel_width,
            pixel_height,
            display,
        })
    }

    /// A surface displayed at its native size at the origin.
    pub fn unscaled(pixel_width: u32, pixel_height: u32) -> ClipdeckResult<Self> {
        Self::new(
            pixel_width,
            pixel_height,
            DisplayRect {
                left: 0.0,
                top: 0.0,
                width: pixel_width as f64,
                height: pixel_height as f64,
            },
        )
    }

    /// Build from configuration, with the surface placed at the origin.
    pub fn from_config(config: &CanvasConfig) -> ClipdeckResult<Self> {
        Self::new(
            config.width,
            config.height,
            DisplayRect {
                left: 0.0,
                top: 0.0,
                width: config.display_width,
                height: config.effective_display_height(),
            },
        )
    }

    /// Backing-store pixels per displayed pixel, per axis.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.pixel_width as f64 / self.display.width,
            self.pixel_height as f64 / self.display.height,
        )
    }

    /// Convert a client (display-space) position into canvas pixels.
    pub fn to_canvas(&self, client: Point) -> Point {
        let (sx, sy) = self.scale();
        Point {
            x: (client.x - self.display.left) * sx,
            y: (client.y - self.display.top) * sy,
        }
    }

    /// Convert a canvas position back into client coordinates.
    pub fn to_client(&self, canvas: Point) -> Point {
        let (sx, sy) = self.scale();
        Point {
            x: canvas.x / sx + self.display.left,
            y: canvas.y / sy + self.display.top,
        }
    }
}

/// Axis-aligned extent of an overlay in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Whether the extent lies entirely inside a `width` x `height` surface.
    pub fn within(&self, width: f64, height: f64) -> bool {
        self.left >= 0.0 && self.top >= 0.0 && self.right <= width && self.bottom <= height
    }
}

/// Text measurement shared by hit-testing and rendering.
///
/// Both sides must use the same implementation, otherwise a text overlay's
/// hit box drifts from its painted glyphs.
pub trait TextMetrics {
    /// Advance width of `text` at the fixed font size.
    fn text_width(&self, text: &str) -> f64;

    /// Height of the text hit box above the baseline (the font size).
    fn font_height(&self) -> f64;
}
