//! Range-slider playback window for the trim and GIF screens.

use clipdeck_common::error::{ClipdeckError, ClipdeckResult};
use clipdeck_transcode::operation::{slider_to_time, ClipRange, SLIDER_MAX};

/// The `[start, end]` slider pair and the seeks it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackWindow {
    sliders: [f64; 2],
}

impl PlaybackWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sliders(&self) -> [f64; 2] {
        self.sliders
    }

    /// Move the sliders. Returns the time the player should seek to (the
    /// new start) when the duration is known.
    pub fn set_sliders(&mut self, values: [f64; 2], duration_secs: Option<f64>) -> ClipdeckResult<Option<f64>> {
        let [lo, hi] = values;
        if !(0.0..=SLIDER_MAX).contains(&lo) || !(0.0..=SLIDER_MAX).contains(&hi) {
            return Err(ClipdeckError::invalid_parameter(format!(
                "Slider values must lie in 0..={SLIDER_MAX}, got [{lo}, {hi}]"
            )));
        }
        if lo > hi {
            return Err(ClipdeckError::invalid_parameter(format!(
                "Slider start {lo} is after end {hi}"
            )));
        }
        self.sliders = values;
        Ok(duration_secs.map(|d| slider_to_time(d, lo)))
    }

    /// Window bounds in seconds.
    pub fn window_secs(&self, duration_secs: f64) -> (f64, f64) {
        (
            slider_to_time(duration_secs, self.sliders[0]),
            slider_to_time(duration_secs, self.sliders[1]),
        )
    }

    /// Called on player time updates while playing. A position outside
    /// the window loops back to its start.
    pub fn on_time_update(&self, position_secs: f64, duration_secs: f64) -> Option<f64> {
        let (start, end) = self.window_secs(duration_secs);
        (position_secs < start || position_secs > end).then_some(start)
    }

    pub fn clip_range(&self, duration_secs: f64) -> ClipdeckResult<ClipRange> {
        ClipRange::from_slider(self.sliders, duration_secs)
    }

    /// Back to the full range.
    pub fn reset(&mut self) {
        self.sliders = [0.0, SLIDER_MAX];
    }
}

impl Default for PlaybackWindow {
    fn default() -> Self {
        Self {
            sliders: [0.0, SLIDER_MAX],
        }
    }
}
