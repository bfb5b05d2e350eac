//! Pointer drag gestures over the overlay store.
//!
//! The controller never mutates the store directly. Each phase takes the
//! current overlays and returns the updated collection when something
//! changed; the session commits it with `replace_all` and redraws.

use clipdeck_common::config::DragPolicy;
use clipdeck_overlay_model::geometry::{Point, TextMetrics};
use clipdeck_overlay_model::overlay::Overlay;

/// Where the gesture currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// No button held.
    #[default]
    Idle,
    /// Button held since the last press.
    Pressed,
}

/// Anchor offset captured on press, used by [`DragPolicy::Grabbed`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    index: usize,
    offset: Point,
}

/// Three-phase press/move/release state machine.
#[derive(Debug, Clone)]
pub struct DragController {
    policy: DragPolicy,
    phase: DragPhase,
    grabs: Vec<Grab>,
}

impl DragController {
    pub fn new(policy: DragPolicy) -> Self {
        Self {
            policy,
            phase: DragPhase::Idle,
            grabs: Vec::new(),
        }
    }

    pub fn policy(&self) -> DragPolicy {
        self.policy
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Flag every overlay whose box contains `p`. Others keep their flag.
    pub fn press(
        &mut self,
        overlays: &[Overlay],
        p: Point,
        metrics: &dyn TextMetrics,
    ) -> Option<Vec<Overlay>> {
        self.phase = DragPhase::Pressed;
        self.grabs.clear();

        let mut next = overlays.to_vec();
        let mut changed = false;
        for (index, overlay) in next.iter_mut().enumerate() {
            if !overlay.contains(p, metrics) {
                continue;
            }
            self.grabs.push(Grab {
                index,
                offset: Point::new(overlay.x - p.x, overlay.y - p.y),
            });
            if !overlay.is_dragging {
                overlay.is_dragging = true;
                changed = true;
            }
        }

        tracing::trace!(x = p.x, y = p.y, grabbed = self.grabs.len(), "Pointer pressed");
        changed.then_some(next)
    }

    /// Move flagged overlays toward `p`.
    ///
    /// Under [`DragPolicy::Contained`] an overlay only follows while `p` is
    /// inside its pre-move box, so a fast pointer can leave it behind.
    /// Under [`DragPolicy::Grabbed`] it keeps the press offset and follows
    /// anywhere.
    pub fn drag_to(
        &mut self,
        overlays: &[Overlay],
        p: Point,
        metrics: &dyn TextMetrics,
    ) -> Option<Vec<Overlay>> {
        let mut next = overlays.to_vec();
        let mut moved = false;

        for (index, overlay) in next.iter_mut().enumerate() {
            if !overlay.is_dragging {
                continue;
            }
            match self.policy {
                DragPolicy::Contained => {
                    if overlay.contains(p, metrics) {
                        overlay.center_on(p, metrics);
                        moved = true;
                    }
                }
                DragPolicy::Grabbed => {
                    match self.grabs.iter().find(|g| g.index == index) {
                        Some(grab) => {
                            overlay.x = p.x + grab.offset.x;
                            overlay.y = p.y + grab.offset.y;
                        }
                        None => overlay.center_on(p, metrics),
                    }
                    moved = true;
                }
            }
        }

        moved.then_some(next)
    }

    /// End the gesture: clear every dragging flag.
    pub fn release(&mut self, overlays: &[Overlay]) -> Option<Vec<Overlay>> {
        self.reset();
        if !overlays.iter().any(|o| o.is_dragging) {
            return None;
        }
        let next = overlays
            .iter()
            .cloned()
            .map(|mut o| {
                o.is_dragging = false;
                o
            })
            .collect();
        Some(next)
    }

    /// Forget press state after the collection changed shape.
    pub fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.grabs.clear();
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragPolicy::default())
    }
}
