//! Overlay editing session.

use clipdeck_common::config::{CanvasConfig, DragPolicy};
use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use clipdeck_overlay_model::color::HexColor;
use clipdeck_overlay_model::geometry::{CanvasSpace, Point};
use clipdeck_overlay_model::hit_test::hit_test;
use clipdeck_overlay_model::overlay::{
    Overlay, DEFAULT_RECT_HEIGHT, DEFAULT_RECT_LABEL, DEFAULT_RECT_WIDTH, DEFAULT_TEXT,
};
use clipdeck_overlay_model::store::{OverlayPatch, OverlayStore};
use clipdeck_render_engine::canvas::{DrawSurface, RasterCanvas};
use clipdeck_render_engine::text::load_glyphs;
use clipdeck_transcode::operation::{ClipOperation, ClipRange, ResizeDimensions};
use clipdeck_transcode::{Artifact, SourceVideo, TranscodeEngine, TranscodePipeline};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::drag::{DragController, DragPhase};
use crate::playback::PlaybackWindow;

/// Parameters of a new rectangle. Unset position is randomized within the
/// canvas; unset size and color take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleSpec {
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<HexColor>,
}

/// Parameters of a new text overlay. `y` is the baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSpec {
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<HexColor>,
}

/// One editor instance: overlay store, drawing surface, pointer gestures,
/// source video and the last transform result.
///
/// Every visible mutation is followed by exactly one full redraw.
pub struct EditorSession<S = RasterCanvas> {
    store: OverlayStore,
    surface: S,
    space: CanvasSpace,
    drag: DragController,
    source: Option<SourceVideo>,
    playback: PlaybackWindow,
    last_result: Option<Artifact>,
    rng: StdRng,
}

impl EditorSession<RasterCanvas> {
    /// Session over an in-memory raster sized by `config`.
    pub fn from_config(config: &CanvasConfig) -> ClipdeckResult<Self> {
        let space = CanvasSpace::from_config(config)?;
        let surface = RasterCanvas::new(config.width, config.height, load_glyphs(config));
        Self::new(surface, space, config.drag_policy)
    }
}

impl<S: DrawSurface> EditorSession<S> {
    /// Create a session. The surface must match the canvas space's pixel
    /// size.
    pub fn new(surface: S, space: CanvasSpace, policy: DragPolicy) -> ClipdeckResult<Self> {
        check_surface(&surface, &space)?;
        tracing::debug!(
            width = space.pixel_width,
            height = space.pixel_height,
            display_width = space.display.width,
            ?policy,
            "Editor session created"
        );
        Ok(Self {
            store: OverlayStore::new(),
            surface,
            space,
            drag: DragController::new(policy),
            source: None,
            playback: PlaybackWindow::new(),
            last_result: None,
            rng: StdRng::from_entropy(),
        })
    }

    /// Make default placement reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn overlays(&self) -> &[Overlay] {
        self.store.overlays()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn canvas_space(&self) -> &CanvasSpace {
        &self.space
    }

    /// Update the displayed geometry after a layout change.
    pub fn set_canvas_space(&mut self, space: CanvasSpace) -> ClipdeckResult<()> {
        check_surface(&self.surface, &space)?;
        self.space = space;
        Ok(())
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Topmost overlay under a client position.
    pub fn overlay_at(&self, client: Point) -> Option<usize> {
        hit_test(
            self.store.overlays(),
            self.space.to_canvas(client),
            self.surface.metrics(),
        )
    }

    // Overlay editing

    /// Append a rectangle. Returns its index.
    pub fn add_rectangle(&mut self, spec: RectangleSpec) -> ClipdeckResult<usize> {
        let (canvas_w, canvas_h) = self.canvas_size();
        let width = spec.width.unwrap_or(DEFAULT_RECT_WIDTH);
        let height = spec.height.unwrap_or(DEFAULT_RECT_HEIGHT);
        let x = match spec.x {
            Some(x) => x,
            None => self.random_between(0.0, canvas_w - width),
        };
        let y = match spec.y {
            Some(y) => y,
            None => self.random_between(0.0, canvas_h - height),
        };

        let overlay = Overlay::rectangle(x, y, width, height, spec.color.unwrap_or_default())?
            .with_label(spec.label.unwrap_or_else(|| DEFAULT_RECT_LABEL.to_string()));
        Ok(self.push(overlay))
    }

    /// Append a text overlay. Returns its index.
    pub fn add_text(&mut self, spec: TextSpec) -> ClipdeckResult<usize> {
        let (canvas_w, canvas_h) = self.canvas_size();
        let label = spec.label.unwrap_or_else(|| DEFAULT_TEXT.to_string());
        let text_width = self.surface.metrics().text_width(&label);
        let font_height = self.surface.metrics().font_height();

        let x = match spec.x {
            Some(x) => x,
            None => self.random_between(0.0, canvas_w - text_width),
        };
        let y = match spec.y {
            Some(y) => y,
            None => self.random_between(font_height.min(canvas_h), canvas_h),
        };

        let overlay = Overlay::text(label, x, y, spec.color.unwrap_or_default())?;
        Ok(self.push(overlay))
    }

    /// Rename an overlay. For text this changes the rendered content.
    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> ClipdeckResult<()> {
        self.update(index, OverlayPatch::label(label))
    }

    pub fn set_color(&mut self, index: usize, color: HexColor) -> ClipdeckResult<()> {
        self.update(index, OverlayPatch::color(color))
    }

    /// Apply a partial update to one overlay.
    pub fn update(&mut self, index: usize, patch: OverlayPatch) -> ClipdeckResult<()> {
        self.store.update_at(index, patch)?;
        tracing::debug!(index, "Overlay updated");
        self.redraw();
        Ok(())
    }

    /// Remove one overlay, keeping the order of the rest.
    pub fn delete(&mut self, index: usize) -> ClipdeckResult<Overlay> {
        let removed = self.store.remove_at(index)?;
        self.drag.reset();
        tracing::debug!(index, kind = ?removed.kind(), "Overlay deleted");
        self.redraw();
        Ok(removed)
    }

    /// Remove every overlay.
    pub fn clear(&mut self) {
        self.store.clear();
        self.drag.reset();
        self.redraw();
    }

    /// Swap in a whole new overlay collection.
    pub fn replace_all(&mut self, overlays: Vec<Overlay>) {
        self.store.replace_all(overlays);
        self.drag.reset();
        self.redraw();
    }

    // Pointer input, in client (displayed) coordinates

    pub fn pointer_down(&mut self, client: Point) {
        let p = self.space.to_canvas(client);
        if let Some(next) = self.drag.press(self.store.overlays(), p, self.surface.metrics()) {
            self.store.replace_all(next);
        }
    }

    /// Returns whether any overlay moved.
    pub fn pointer_move(&mut self, client: Point) -> bool {
        let p = self.space.to_canvas(client);
        match self.drag.drag_to(self.store.overlays(), p, self.surface.metrics()) {
            Some(next) => {
                self.store.replace_all(next);
                self.redraw();
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(next) = self.drag.release(self.store.overlays()) {
            self.store.replace_all(next);
        }
    }

    /// The pointer left the surface; same as releasing the button.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Press, move through `path`, release.
    pub fn drag_gesture(&mut self, from: Point, path: &[Point]) -> usize {
        self.pointer_down(from);
        let mut moves = 0;
        for &p in path {
            if self.pointer_move(p) {
                moves += 1;
            }
        }
        self.pointer_up();
        moves
    }

    // Source video and sliders

    pub fn source(&self) -> Option<&SourceVideo> {
        self.source.as_ref()
    }

    /// Load or remove the source video. Removing it discards overlays, the
    /// slider range and the last result.
    pub fn set_source(&mut self, source: Option<SourceVideo>) {
        match source {
            Some(video) => {
                tracing::info!(name = %video.name, bytes = video.bytes.len(), duration_secs = ?video.duration_secs, "Source video loaded");
                self.source = Some(video);
            }
            None => {
                tracing::info!("Source video removed, resetting editor");
                self.source = None;
                self.playback.reset();
                self.last_result = None;
                self.clear();
            }
        }
    }

    pub fn playback(&self) -> &PlaybackWindow {
        &self.playback
    }

    /// Move the range sliders. Returns the seek target for the player.
    pub fn set_sliders(&mut self, values: [f64; 2]) -> ClipdeckResult<Option<f64>> {
        let duration = self.source.as_ref().and_then(|s| s.duration_secs);
        self.playback.set_sliders(values, duration)
    }

    // Transforms

    /// Current canvas raster as PNG.
    pub fn snapshot_png(&self) -> ClipdeckResult<Vec<u8>> {
        self.surface.snapshot_png()
    }

    /// Composite the overlay canvas onto the source video.
    pub async fn composite<E: TranscodeEngine>(
        &mut self,
        pipeline: &TranscodePipeline<E>,
    ) -> ClipdeckResult<&Artifact> {
        self.require_source()?;
        let snapshot_png = self.snapshot_png()?;
        self.run(pipeline, ClipOperation::Overlay { snapshot_png }).await
    }

    /// Stream-copy the slider range.
    pub async fn trim<E: TranscodeEngine>(
        &mut self,
        pipeline: &TranscodePipeline<E>,
    ) -> ClipdeckResult<&Artifact> {
        let range = self.slider_range()?;
        self.run(pipeline, ClipOperation::Trim(range)).await
    }

    /// Convert the slider range to a GIF.
    pub async fn gif<E: TranscodeEngine>(
        &mut self,
        pipeline: &TranscodePipeline<E>,
    ) -> ClipdeckResult<&Artifact> {
        let range = self.slider_range()?;
        self.run(pipeline, ClipOperation::Gif(range)).await
    }

    pub async fn resize<E: TranscodeEngine>(
        &mut self,
        pipeline: &TranscodePipeline<E>,
        dimensions: ResizeDimensions,
    ) -> ClipdeckResult<&Artifact> {
        self.run(pipeline, ClipOperation::Resize(dimensions)).await
    }

    /// Result of the last successful transform.
    pub fn last_result(&self) -> Option<&Artifact> {
        self.last_result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<Artifact> {
        self.last_result.take()
    }

    // Internal helpers

    fn push(&mut self, overlay: Overlay) -> usize {
        let kind = overlay.kind();
        let (x, y) = (overlay.x, overlay.y);
        let index = self.store.add(overlay);
        tracing::debug!(index, ?kind, x, y, "Overlay added");
        self.redraw();
        index
    }

    fn redraw(&mut self) {
        self.surface.redraw(self.store.overlays());
    }

    fn canvas_size(&self) -> (f64, f64) {
        (self.space.pixel_width as f64, self.space.pixel_height as f64)
    }

    /// Uniform in `[lo, hi]`, or `lo` clamped at zero when the range is
    /// empty (the overlay is larger than the canvas).
    fn random_between(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.rng.gen_range(lo..=hi)
        } else {
            lo.max(0.0)
        }
    }

    fn require_source(&self) -> ClipdeckResult<&SourceVideo> {
        self.source
            .as_ref()
            .ok_or_else(|| ClipdeckError::precondition("No source video loaded"))
    }

    fn slider_range(&self) -> ClipdeckResult<ClipRange> {
        let duration = self.require_source()?.require_duration()?;
        self.playback.clip_range(duration)
    }

    async fn run<E: TranscodeEngine>(
        &mut self,
        pipeline: &TranscodePipeline<E>,
        operation: ClipOperation,
    ) -> ClipdeckResult<&Artifact> {
        let source = self.require_source()?;
        let artifact = pipeline.run(&operation, source).await?;
        Ok(self.last_result.insert(artifact))
    }
}

fn check_surface<S: DrawSurface>(surface: &S, space: &CanvasSpace) -> ClipdeckResult<()> {
    let expected = (space.pixel_width, space.pixel_height);
    if surface.size() != expected {
        return Err(ClipdeckError::precondition(format!(
            "Drawing surface is {:?} but canvas space expects {:?}",
            surface.size(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipdeck_common::config::ConcurrencyPolicy;
    use clipdeck_overlay_model::geometry::{DisplayRect, TextMetrics};
    use clipdeck_render_engine::text::BlockGlyphs;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Surface that records redraws instead of rasterizing.
    struct RecordingSurface {
        metrics: BlockGlyphs,
        size: (u32, u32),
        frames: Vec<Vec<Overlay>>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                metrics: BlockGlyphs::new(48.0),
                size: (width, height),
                frames: Vec::new(),
            }
        }
    }

    impl DrawSurface for RecordingSurface {
        fn redraw(&mut self, overlays: &[Overlay]) {
            self.frames.push(overlays.to_vec());
        }

        fn metrics(&self) -> &dyn TextMetrics {
            &self.metrics
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn snapshot_png(&self) -> ClipdeckResult<Vec<u8>> {
            Ok(format!("frame-{}", self.frames.len()).into_bytes())
        }
    }

    fn session() -> EditorSession<RecordingSurface> {
        let space = CanvasSpace::unscaled(1920, 1080).unwrap();
        EditorSession::new(RecordingSurface::new(1920, 1080), space, DragPolicy::Contained)
            .unwrap()
            .with_seed(7)
    }

    fn at(x: f64, y: f64) -> RectangleSpec {
        RectangleSpec {
            x: Some(x),
            y: Some(y),
            ..RectangleSpec::default()
        }
    }

    #[derive(Default)]
    struct FakeEngine {
        files: Mutex<HashMap<String, Vec<u8>>>,
        commands: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TranscodeEngine for FakeEngine {
        async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(name.to_string(), bytes.to_vec());
            Ok(())
        }

        async fn read_file(&self, name: &str) -> ClipdeckResult<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| ClipdeckError::transcode(format!("no {name}")))
        }

        async fn remove_file(&self, name: &str) -> ClipdeckResult<()> {
            self.files.lock().unwrap().remove(name);
            Ok(())
        }

        async fn run(&self, args: &[String]) -> ClipdeckResult<()> {
            self.commands.lock().unwrap().push(args.to_vec());
            if self.fail {
                return Err(ClipdeckError::transcode("engine exploded"));
            }
            let output = args.last().cloned().unwrap_or_default();
            self.files.lock().unwrap().insert(output, b"media".to_vec());
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn pipeline(fail: bool) -> TranscodePipeline<FakeEngine> {
        let engine = FakeEngine {
            fail,
            ..FakeEngine::default()
        };
        TranscodePipeline::new(engine, ConcurrencyPolicy::Reject)
    }

    #[test]
    fn test_delete_middle_keeps_order_with_one_redraw() {
        let mut s = session();
        s.add_rectangle(at(0.0, 0.0)).unwrap();
        s.add_text(TextSpec {
            label: Some("B".into()),
            x: Some(10.0),
            y: Some(300.0),
            ..TextSpec::default()
        })
        .unwrap();
        s.add_rectangle(at(500.0, 500.0)).unwrap();
        let before = s.surface().frames.len();

        let removed = s.delete(1).unwrap();
        assert_eq!(removed.label, "B");
        let positions: Vec<(f64, f64)> = s.overlays().iter().map(|o| (o.x, o.y)).collect();
        assert_eq!(positions, vec![(0.0, 0.0), (500.0, 500.0)]);
        assert_eq!(s.surface().frames.len(), before + 1);
        assert_eq!(s.surface().frames.last().unwrap().as_slice(), s.overlays());
    }

    #[test]
    fn test_delete_out_of_range_does_not_redraw() {
        let mut s = session();
        s.add_rectangle(RectangleSpec::default()).unwrap();
        let before = s.surface().frames.len();
        assert!(matches!(
            s.delete(5),
            Err(ClipdeckError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(s.overlays().len(), 1);
        assert_eq!(s.surface().frames.len(), before);
    }

    #[test]
    fn test_add_text_defaults_land_inside_canvas() {
        let mut s = session();
        for _ in 0..200 {
            let index = s.add_text(TextSpec::default()).unwrap();
            let overlay = &s.overlays()[index];
            assert_eq!(overlay.label, DEFAULT_TEXT);
            assert_eq!(overlay.color.as_str(), "#000");
            let bounds = overlay.bounds(s.surface().metrics());
            assert!(bounds.within(1920.0, 1080.0), "{bounds:?} outside canvas");
        }
    }

    #[test]
    fn test_add_rectangle_defaults_land_inside_canvas() {
        let mut s = session();
        for _ in 0..200 {
            let index = s.add_rectangle(RectangleSpec::default()).unwrap();
            let overlay = &s.overlays()[index];
            assert_eq!(overlay.label, DEFAULT_RECT_LABEL);
            let bounds = overlay.bounds(s.surface().metrics());
            assert_eq!((bounds.width(), bounds.height()), (150.0, 100.0));
            assert!(bounds.within(1920.0, 1080.0), "{bounds:?} outside canvas");
        }
    }

    #[test]
    fn test_rejected_rectangle_adds_nothing() {
        let mut s = session();
        let spec = RectangleSpec {
            width: Some(0.0),
            ..at(1.0, 1.0)
        };
        assert!(s.add_rectangle(spec).is_err());
        assert!(s.overlays().is_empty());
    }

    #[test]
    fn test_label_and_color_edits_redraw() {
        let mut s = session();
        s.add_text(TextSpec::default()).unwrap();
        let before = s.surface().frames.len();

        s.set_label(0, "Title").unwrap();
        s.set_color(0, "#ff0000".parse().unwrap()).unwrap();
        assert_eq!(s.overlays()[0].label, "Title");
        assert_eq!(s.overlays()[0].color.rgba(), [255, 0, 0, 255]);
        assert_eq!(s.surface().frames.len(), before + 2);
        assert!(s.set_label(3, "nope").is_err());
    }

    #[test]
    fn test_scaled_pointer_drag() {
        let space = CanvasSpace::new(
            1920,
            1080,
            DisplayRect {
                left: 0.0,
                top: 0.0,
                width: 960.0,
                height: 540.0,
            },
        )
        .unwrap();
        let mut s =
            EditorSession::new(RecordingSurface::new(1920, 1080), space, DragPolicy::Contained)
                .unwrap();
        s.add_rectangle(at(100.0, 100.0)).unwrap();

        // Client (60, 60) is canvas (120, 120).
        s.pointer_down(Point::new(60.0, 60.0));
        assert!(s.overlays()[0].is_dragging);
        assert_eq!(s.drag_phase(), DragPhase::Pressed);

        let before = s.surface().frames.len();
        assert!(s.pointer_move(Point::new(80.0, 80.0)));
        assert_eq!((s.overlays()[0].x, s.overlays()[0].y), (85.0, 110.0));
        assert_eq!(s.surface().frames.len(), before + 1);

        s.pointer_leave();
        assert!(!s.overlays()[0].is_dragging);
        assert_eq!(s.drag_phase(), DragPhase::Idle);
        assert!(!s.pointer_move(Point::new(90.0, 90.0)));
    }

    #[test]
    fn test_overlay_at_prefers_topmost() {
        let mut s = session();
        s.add_rectangle(at(0.0, 0.0)).unwrap();
        s.add_rectangle(at(100.0, 50.0)).unwrap();
        assert_eq!(s.overlay_at(Point::new(120.0, 60.0)), Some(1));
        assert_eq!(s.overlay_at(Point::new(10.0, 10.0)), Some(0));
        assert_eq!(s.overlay_at(Point::new(1000.0, 1000.0)), None);
    }

    #[test]
    fn test_drag_gesture_counts_moves() {
        let mut s = session();
        s.add_rectangle(at(0.0, 0.0)).unwrap();
        let moves = s.drag_gesture(
            Point::new(75.0, 50.0),
            &[Point::new(80.0, 55.0), Point::new(90.0, 60.0)],
        );
        assert_eq!(moves, 2);
        assert_eq!((s.overlays()[0].x, s.overlays()[0].y), (15.0, 10.0));
        assert!(!s.overlays()[0].is_dragging);
    }

    #[test]
    fn test_surface_size_must_match_space() {
        let space = CanvasSpace::unscaled(1920, 1080).unwrap();
        let result =
            EditorSession::new(RecordingSurface::new(640, 480), space, DragPolicy::default());
        assert!(matches!(result, Err(ClipdeckError::Precondition { .. })));
    }

    #[test]
    fn test_removing_source_resets_editor() {
        let mut s = session();
        s.set_source(Some(SourceVideo::new("a.mp4", vec![1], Some(10.0))));
        s.add_rectangle(RectangleSpec::default()).unwrap();
        assert_eq!(s.set_sliders([20.0, 60.0]).unwrap(), Some(2.0));

        s.set_source(None);
        assert!(s.source().is_none());
        assert!(s.overlays().is_empty());
        assert_eq!(s.playback().sliders(), [0.0, 100.0]);
        assert!(s.last_result().is_none());
    }

    #[tokio::test]
    async fn test_composite_requires_source() {
        let mut s = session();
        let err = s.composite(&pipeline(false)).await.unwrap_err();
        assert!(matches!(err, ClipdeckError::Precondition { .. }));
    }

    #[tokio::test]
    async fn test_composite_stages_current_snapshot() {
        let mut s = session();
        s.set_source(Some(SourceVideo::new("a.mp4", b"video".to_vec(), None)));
        s.add_rectangle(RectangleSpec::default()).unwrap();
        let expected_png = s.snapshot_png().unwrap();

        let p = pipeline(false);
        let artifact = s.composite(&p).await.unwrap();
        assert_eq!(artifact.mime, "video/mp4");
        assert_eq!(artifact.bytes, b"media");
        assert_eq!(
            p.engine().files.lock().unwrap()["filter.png"],
            expected_png
        );
        assert!(s.last_result().is_some());
    }

    #[tokio::test]
    async fn test_trim_uses_slider_range() {
        let mut s = session();
        s.set_source(Some(SourceVideo::new("a.mp4", vec![1], Some(100.0))));
        s.set_sliders([25.0, 75.0]).unwrap();

        let p = pipeline(false);
        s.trim(&p).await.unwrap();
        let commands = p.engine().commands.lock().unwrap();
        assert_eq!(
            commands[0],
            ["-i", "input.mp4", "-ss", "25", "-to", "75", "-c", "copy", "output.mp4"]
        );
    }

    #[tokio::test]
    async fn test_gif_requires_duration() {
        let mut s = session();
        s.set_source(Some(SourceVideo::new("a.mp4", vec![1], None)));
        let err = s.gif(&pipeline(false)).await.unwrap_err();
        assert!(matches!(err, ClipdeckError::Precondition { .. }));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result_and_overlays() {
        let mut s = session();
        s.set_source(Some(SourceVideo::new("a.mp4", vec![1], Some(4.0))));
        s.add_rectangle(RectangleSpec::default()).unwrap();

        s.gif(&pipeline(false)).await.unwrap();
        let dims = ResizeDimensions::new(320, 240).unwrap();
        let err = s.resize(&pipeline(true), dims).await.unwrap_err();

        assert!(matches!(err, ClipdeckError::Transcode { .. }));
        assert_eq!(s.last_result().unwrap().mime, "image/gif");
        assert_eq!(s.overlays().len(), 1);
    }
}
