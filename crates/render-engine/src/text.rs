//! Text faces: measurement plus glyph rasterization.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clipdeck_common::config::CanvasConfig;
use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use clipdeck_overlay_model::geometry::TextMetrics;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{Blend, Canvas};
use rusttype::{point, Font, Scale};

use crate::canvas::fill_box;

/// Fonts tried when no font path is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A text face that can paint glyphs as well as measure them.
pub trait GlyphRasterizer: TextMetrics + Send + Sync {
    /// Paint `text` with its baseline starting at `(x, y)`.
    fn draw_text(&self, canvas: &mut Blend<RgbaImage>, text: &str, x: f64, y: f64, color: Rgba<u8>);

    /// Face name for logging.
    fn name(&self) -> &str;
}

/// A TrueType/OpenType face at a fixed pixel size.
pub struct FontFace {
    font: Font<'static>,
    size: f32,
    name: String,
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>, size: f64, name: impl Into<String>) -> ClipdeckResult<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| ClipdeckError::render("Font data is not a valid TrueType/OpenType face"))?;
        Ok(Self {
            font,
            size: size as f32,
            name: name.into(),
        })
    }

    pub fn load(path: &Path, size: f64) -> ClipdeckResult<Self> {
        if !path.exists() {
            return Err(ClipdeckError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes, size, path.display().to_string())
    }

    fn scale(&self) -> Scale {
        Scale::uniform(self.size)
    }
}

impl TextMetrics for FontFace {
    fn text_width(&self, text: &str) -> f64 {
        self.font
            .layout(text, self.scale(), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0) as f64
    }

    fn font_height(&self) -> f64 {
        self.size as f64
    }
}

impl GlyphRasterizer for FontFace {
    fn draw_text(&self, canvas: &mut Blend<RgbaImage>, text: &str, x: f64, y: f64, color: Rgba<u8>) {
        let (width, height) = canvas.dimensions();
        for glyph in self
            .font
            .layout(text, self.scale(), point(x as f32, y as f32))
        {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
                if alpha > 0 {
                    canvas.draw_pixel(
                        px as u32,
                        py as u32,
                        Rgba([color[0], color[1], color[2], alpha]),
                    );
                }
            });
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fixed-advance face that paints each glyph as a solid cell.
///
/// Used when no font file is available. Deterministic across machines,
/// which also makes it the face used in tests.
#[derive(Debug, Clone, Copy)]
pub struct BlockGlyphs {
    size: f64,
}

impl BlockGlyphs {
    /// Advance per character, as a fraction of the font size.
    pub const ADVANCE: f64 = 0.6;

    /// Cell height above the baseline, as a fraction of the font size.
    pub const CAP_HEIGHT: f64 = 0.7;

    pub fn new(size: f64) -> Self {
        Self { size }
    }

    fn advance(&self) -> f64 {
        self.size * Self::ADVANCE
    }
}

impl TextMetrics for BlockGlyphs {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance()
    }

    fn font_height(&self) -> f64 {
        self.size
    }
}

impl GlyphRasterizer for BlockGlyphs {
    fn draw_text(&self, canvas: &mut Blend<RgbaImage>, text: &str, x: f64, y: f64, color: Rgba<u8>) {
        let advance = self.advance();
        let cell_w = (advance * 0.8).round().max(1.0);
        let cell_h = (self.size * Self::CAP_HEIGHT).round().max(1.0);
        let top = (y - cell_h).round();

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = (x + i as f64 * advance + advance * 0.1).round();
            fill_box(canvas, left, top, left + cell_w, top + cell_h, color);
        }
    }

    fn name(&self) -> &str {
        "block"
    }
}

/// Pick the text face for a canvas configuration.
///
/// A configured font that fails to load is logged and skipped; the search
/// then falls through to system fonts and finally to [`BlockGlyphs`].
pub fn load_glyphs(config: &CanvasConfig) -> Arc<dyn GlyphRasterizer> {
    let configured = config.font_path.iter().cloned();
    let system = SYSTEM_FONT_CANDIDATES.iter().map(|p| PathBuf::from(*p));

    for (i, path) in configured.chain(system).enumerate() {
        let explicit = i == 0 && config.font_path.is_some();
        if !explicit && !path.exists() {
            continue;
        }
        match FontFace::load(&path, config.font_size) {
            Ok(face) => {
                tracing::debug!(font = %path.display(), size = config.font_size, "Loaded overlay font");
                return Arc::new(face);
            }
            Err(e) => {
                tracing::warn!(font = %path.display(), error = %e, "Failed to load overlay font");
            }
        }
    }

    tracing::info!(size = config.font_size, "No font file available, using block glyphs");
    Arc::new(BlockGlyphs::new(config.font_size))
}
