//! Overlay records.
//!
//! An overlay is a rectangle or a run of text painted over the video frame.
//! The anchor `(x, y)` is the top-left corner for rectangles and the text
//! baseline start for text, so text grows upward from its anchor.

use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::geometry::{Bounds, Point, TextMetrics};

/// Default label of a new rectangle overlay.
pub const DEFAULT_RECT_LABEL: &str = "Rectangle";

/// Default content of a new text overlay.
pub const DEFAULT_TEXT: &str = "Hello World";

/// Default rectangle size in canvas pixels.
pub const DEFAULT_RECT_WIDTH: f64 = 150.0;
pub const DEFAULT_RECT_HEIGHT: f64 = 100.0;

/// Overlay discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Rectangle,
    Text,
}

/// Kind-specific geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangle { width: f64, height: f64 },
    /// Sized by its label at the fixed font size.
    Text,
}

/// A single annotation on the overlay canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Display name; for text overlays also the rendered content.
    pub label: String,

    /// Anchor X in canvas pixels.
    pub x: f64,

    /// Anchor Y in canvas pixels.
    pub y: f64,

    /// Fill color.
    pub color: HexColor,

    #[serde(flatten)]
    pub shape: Shape,

    /// Set while the pointer holds this overlay. Never serialized.
    #[serde(skip)]
    pub is_dragging: bool,
}

impl Overlay {
    /// Create a rectangle overlay. Width and height must be positive.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64, color: HexColor) -> ClipdeckResult<Self> {
        validate_position(x, y)?;
        validate_size(width, height)?;
        Ok(Self {
            label: DEFAULT_RECT_LABEL.to_string(),
            x,
            y,
            color,
            shape: Shape::Rectangle { width, height },
            is_dragging: false,
        })
    }

    /// Create a text overlay anchored at its baseline.
    pub fn text(label: impl Into<String>, x: f64, y: f64, color: HexColor) -> ClipdeckResult<Self> {
        validate_position(x, y)?;
        Ok(Self {
            label: label.into(),
            x,
            y,
            color,
            shape: Shape::Text,
            is_dragging: false,
        })
    }

    /// Builder-style label override.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn kind(&self) -> OverlayKind {
        match self.shape {
            Shape::Rectangle { .. } => OverlayKind::Rectangle,
            Shape::Text => OverlayKind::Text,
        }
    }

    /// Current extent. Always recomputed: labels and sizes change between
    /// checks.
    pub fn bounds(&self, metrics: &dyn TextMetrics) -> Bounds {
        match self.shape {
            Shape::Rectangle { width, height } => Bounds {
                left: self.x,
                top: self.y,
                right: self.x + width,
                bottom: self.y + height,
            },
            Shape::Text => Bounds {
                left: self.x,
                top: self.y - metrics.font_height(),
                right: self.x + metrics.text_width(&self.label),
                bottom: self.y,
            },
        }
    }

    /// Whether `p` falls inside this overlay.
    ///
    /// Rectangles are half-open on the far edges. Text boxes are open at the
    /// top and closed at the baseline, matching baseline rendering.
    pub fn contains(&self, p: Point, metrics: &dyn TextMetrics) -> bool {
        let b = self.bounds(metrics);
        match self.shape {
            Shape::Rectangle { .. } => {
                p.x >= b.left && p.x < b.right && p.y >= b.top && p.y < b.bottom
            }
            Shape::Text => p.x >= b.left && p.x < b.right && p.y > b.top && p.y <= b.bottom,
        }
    }

    /// Re-anchor so the overlay is centered on `p`.
    ///
    /// Rectangles center both axes. Text centers horizontally and puts the
    /// baseline half a font height below the pointer.
    pub fn center_on(&mut self, p: Point, metrics: &dyn TextMetrics) {
        match self.shape {
            Shape::Rectangle { width, height } => {
                self.x = p.x - width / 2.0;
                self.y = p.y - height / 2.0;
            }
            Shape::Text => {
                self.x = p.x - metrics.text_width(&self.label) / 2.0;
                self.y = p.y + metrics.font_height() / 2.0;
            }
        }
    }
}

fn validate_position(x: f64, y: f64) -> ClipdeckResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ClipdeckError::invalid_parameter(format!(
            "Overlay position must be finite, got ({x}, {y})"
        )));
    }
    Ok(())
}

pub(crate) fn validate_size(width: f64, height: f64) -> ClipdeckResult<()> {
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return Err(ClipdeckError::invalid_parameter(format!(
            "Rectangle size must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}
