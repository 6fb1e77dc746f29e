//! Drag-to-pan controller.
//!
//! Owns the pan offset and arbitrates its two writers: the pointer while a
//! drag is active, and the momentum simulator after release. Starting a drag
//! always cancels momentum first, so the two never interleave.

use bevy::log::debug;
use bevy::math::DVec2;

use super::momentum::{MomentumSettings, MomentumSimulator, MomentumState};
use super::velocity::VelocityTracker;

#[derive(Debug, Clone, Default)]
pub struct PanController {
    offset: DVec2,
    drag: Option<VelocityTracker>,
    momentum: MomentumSimulator,
}

impl PanController {
    pub fn new(settings: MomentumSettings) -> Self {
        Self {
            offset: DVec2::ZERO,
            drag: None,
            momentum: MomentumSimulator::new(settings),
        }
    }

    /// Cumulative pan displacement. Unbounded; wrapping happens only when
    /// cells are mapped to the screen.
    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_coasting(&self) -> bool {
        self.momentum.is_running()
    }

    /// Pointer went down on the grid. Any in-flight momentum stops here.
    pub fn on_drag_start(&mut self) {
        if let MomentumState::Running { velocity } = self.momentum.state() {
            debug!(
                "Drag started, cancelling momentum at {:.1} px/s",
                velocity.length()
            );
        }
        self.momentum.cancel();
        self.drag = Some(VelocityTracker::default());
    }

    /// Move the grid by the pointer delta, 1:1. Ignored outside a drag.
    pub fn on_drag_delta(&mut self, delta: DVec2) {
        if self.drag.is_some() {
            self.offset += delta;
        }
    }

    /// Feed the pointer position at `now` (seconds) for release velocity.
    pub fn record_sample(&mut self, now: f64, position: DVec2) {
        if let Some(tracker) = self.drag.as_mut() {
            tracker.push(now, position);
        }
    }

    /// Pointer released with `velocity` (pixels/second). Coasts when either
    /// axis is above the momentum threshold, otherwise stays put.
    pub fn on_drag_end(&mut self, velocity: DVec2) {
        self.drag = None;
        if self.momentum.start(velocity) {
            debug!("Coasting at {:.1} px/s", velocity.length());
        }
    }

    /// Release using the velocity estimated from recorded samples.
    pub fn release(&mut self, now: f64) {
        let velocity = self
            .drag
            .as_ref()
            .map(|tracker| tracker.velocity(now))
            .unwrap_or(DVec2::ZERO);
        self.on_drag_end(velocity);
    }

    /// Advance momentum by one frame of `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f64) {
        if self.drag.is_some() {
            return;
        }
        self.momentum.step(elapsed, &mut self.offset);
    }

    /// Stop all motion without moving the offset. Used when the grid is
    /// rebuilt so no stale momentum survives the new layout.
    pub fn halt(&mut self) {
        self.drag = None;
        self.momentum.cancel();
    }
}
