//! Full-surface overlay rendering.

use std::io::Cursor;
use std::sync::Arc;

use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use clipdeck_overlay_model::geometry::TextMetrics;
use clipdeck_overlay_model::overlay::{Overlay, Shape};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, Blend};
use imageproc::rect::Rect;

use crate::text::GlyphRasterizer;

/// A drawing surface the editor redraws after every overlay mutation.
pub trait DrawSurface {
    /// Clear and repaint the whole surface from `overlays`.
    fn redraw(&mut self, overlays: &[Overlay]);

    /// Text measurement used for painting, shared with hit-testing.
    fn metrics(&self) -> &dyn TextMetrics;

    /// Backing-store size in pixels.
    fn size(&self) -> (u32, u32);

    /// The current raster encoded as PNG.
    fn snapshot_png(&self) -> ClipdeckResult<Vec<u8>>;
}

/// Render `overlays` onto a fresh transparent `width` x `height` raster.
///
/// Overlays are painted in order, so later ones end up on top. The output
/// depends only on the inputs.
pub fn render(
    overlays: &[Overlay],
    width: u32,
    height: u32,
    glyphs: &dyn GlyphRasterizer,
) -> RgbaImage {
    let mut canvas = Blend(RgbaImage::new(width, height));
    for overlay in overlays {
        paint(&mut canvas, overlay, glyphs);
    }
    canvas.0
}

fn paint(canvas: &mut Blend<RgbaImage>, overlay: &Overlay, glyphs: &dyn GlyphRasterizer) {
    let color = Rgba(overlay.color.rgba());
    match overlay.shape {
        Shape::Rectangle { width, height } => {
            fill_box(
                canvas,
                overlay.x,
                overlay.y,
                overlay.x + width,
                overlay.y + height,
                color,
            );
        }
        Shape::Text => {
            glyphs.draw_text(canvas, &overlay.label, overlay.x, overlay.y, color);
        }
    }
}

/// Fill the box `[left, right) x [top, bottom)` given in canvas pixels.
///
/// Edges are rounded and clipped to the raster in float space, so boxes far
/// outside it never reach the i32/u32 pixel range.
pub(crate) fn fill_box(
    canvas: &mut Blend<RgbaImage>,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    color: Rgba<u8>,
) {
    let (width, height) = canvas.0.dimensions();
    let clip = |v: f64, max: u32| v.round().clamp(0.0, max as f64);
    let (left, right) = (clip(left, width), clip(right, width));
    let (top, bottom) = (clip(top, height), clip(bottom, height));
    if right <= left || bottom <= top {
        return;
    }
    let rect = Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}

/// In-memory raster surface backed by [`render`].
pub struct RasterCanvas {
    width: u32,
    height: u32,
    glyphs: Arc<dyn GlyphRasterizer>,
    raster: RgbaImage,
    redraws: u64,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, glyphs: Arc<dyn GlyphRasterizer>) -> Self {
        Self {
            width,
            height,
            glyphs,
            raster: RgbaImage::new(width, height),
            redraws: 0,
        }
    }

    /// The current raster.
    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Number of redraws performed so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn glyphs(&self) -> &Arc<dyn GlyphRasterizer> {
        &self.glyphs
    }
}

impl DrawSurface for RasterCanvas {
    fn redraw(&mut self, overlays: &[Overlay]) {
        self.raster = render(overlays, self.width, self.height, self.glyphs.as_ref());
        self.redraws += 1;
        tracing::trace!(overlays = overlays.len(), redraws = self.redraws, "Canvas redrawn");
    }

    fn metrics(&self) -> &dyn TextMetrics {
        self.glyphs.as_ref()
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn snapshot_png(&self) -> ClipdeckResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.raster
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| ClipdeckError::render(format!("Failed to encode canvas snapshot: {e}")))?;
        Ok(buf.into_inner())
    }
}
