//! The ordered overlay collection.
//!
//! Iteration order is paint order: later overlays are drawn on top. The
//! store never draws; callers redraw after every mutation.

use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::overlay::{validate_size, Overlay, Shape};

/// Partial update applied by [`OverlayStore::update_at`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<HexColor>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl OverlayPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn color(color: HexColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Apply to an overlay, validating first so a rejected patch changes
    /// nothing.
    fn apply(self, overlay: &mut Overlay) -> ClipdeckResult<()> {
        let resized = self.width.is_some() || self.height.is_some();
        let new_shape = match (overlay.shape, resized) {
            (_, false) => overlay.shape,
            (Shape::Text, true) => {
                return Err(ClipdeckError::invalid_parameter(
                    "Text overlays are sized by their label and font size",
                ));
            }
            (Shape::Rectangle { width, height }, true) => {
                let width = self.width.unwrap_or(width);
                let height = self.height.unwrap_or(height);
                validate_size(width, height)?;
                Shape::Rectangle { width, height }
            }
        };
        for v in [self.x, self.y].into_iter().flatten() {
            if !v.is_finite() {
                return Err(ClipdeckError::invalid_parameter(format!(
                    "Overlay position must be finite, got {v}"
                )));
            }
        }

        overlay.shape = new_shape;
        if let Some(label) = self.label {
            overlay.label = label;
        }
        if let Some(color) = self.color {
            overlay.color = color;
        }
        if let Some(x) = self.x {
            overlay.x = x;
        }
        if let Some(y) = self.y {
            overlay.y = y;
        }
        Ok(())
    }
}

/// Single source of truth for what is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStore {
    overlays: Vec<Overlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an overlay on top of the others. Returns its index.
    pub fn add(&mut self, overlay: Overlay) -> usize {
        self.overlays.push(overlay);
        self.overlays.len() - 1
    }

    /// Update fields of the overlay at `index` in place.
    pub fn update_at(&mut self, index: usize, patch: OverlayPatch) -> ClipdeckResult<()> {
        let len = self.overlays.len();
        let overlay = self
            .overlays
            .get_mut(index)
            .ok_or(ClipdeckError::IndexOutOfRange { index, len })?;
        patch.apply(overlay)
    }

    /// Remove the overlay at `index`, keeping the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> ClipdeckResult<Overlay> {
        if index >= self.overlays.len() {
            return Err(ClipdeckError::IndexOutOfRange {
                index,
                len: self.overlays.len(),
            });
        }
        Ok(self.overlays.remove(index))
    }

    /// Replace the whole collection (used to commit drag gestures).
    pub fn replace_all(&mut self, overlays: Vec<Overlay>) {
        self.overlays = overlays;
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn get(&self, index: usize) -> Option<&Overlay> {
        self.overlays.get(index)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Overlay> {
        self.overlays.iter()
    }

    /// Number of overlays currently held by the pointer.
    pub fn dragging_count(&self) -> usize {
        self.overlays.iter().filter(|o| o.is_dragging).count()
    }
}
