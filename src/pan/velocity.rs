//! Release velocity estimation from recent pointer samples.

use std::collections::VecDeque;

use bevy::math::DVec2;

use crate::constants::VELOCITY_WINDOW_SECS;

/// Keeps the pointer positions of the last [`VELOCITY_WINDOW_SECS`] of a drag
/// and derives a pixels-per-second velocity from them.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, DVec2)>,
    window: f64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(VELOCITY_WINDOW_SECS)
    }
}

impl VelocityTracker {
    pub fn new(window: f64) -> Self {
        Self {
            samples: VecDeque::new(),
            window,
        }
    }

    /// Record the pointer at `position` at time `now` (seconds).
    pub fn push(&mut self, now: f64, position: DVec2) {
        self.samples.push_back((now, position));
        self.evict(now);
    }

    /// Velocity over the sample window ending at `now`.
    ///
    /// A pointer that sat still for longer than the window before release
    /// reports zero, so a slow deliberate drop doesn't coast.
    pub fn velocity(&self, now: f64) -> DVec2 {
        let cutoff = now - self.window;
        let mut recent = self.samples.iter().filter(|(t, _)| *t >= cutoff);

        let Some(&(t0, p0)) = recent.next() else {
            return DVec2::ZERO;
        };
        let Some(&(t1, p1)) = recent.last() else {
            return DVec2::ZERO;
        };

        let dt = t1 - t0;
        if dt <= f64::EPSILON {
            return DVec2::ZERO;
        }
        (p1 - p0) / dt
    }

    fn evict(&mut self, now: f64) {
        let cutoff = now - self.window;
        while let Some(&(t, _)) = self.samples.front() {
            if t >= cutoff {
                break;
            }
            self.samples.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_is_still() {
        let tracker = VelocityTracker::default();
        assert_eq!(tracker.velocity(1.0), DVec2::ZERO);
    }

    #[test]
    fn test_single_sample_is_still() {
        let mut tracker = VelocityTracker::default();
        tracker.push(1.0, DVec2::new(10.0, 10.0));
        assert_eq!(tracker.velocity(1.0), DVec2::ZERO);
    }

    #[test]
    fn test_constant_motion() {
        let mut tracker = VelocityTracker::new(0.1);
        // 10 px every 1/64 s = 640 px/s
        for i in 0..6 {
            let t = i as f64 / 64.0;
            tracker.push(t, DVec2::new(i as f64 * 10.0, 0.0));
        }
        let v = tracker.velocity(5.0 / 64.0);
        assert!((v.x - 640.0).abs() < 1e-9);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_old_samples_are_ignored() {
        let mut tracker = VelocityTracker::new(0.1);
        tracker.push(0.0, DVec2::new(0.0, 0.0));
        tracker.push(0.5, DVec2::new(500.0, 0.0));
        tracker.push(0.5625, DVec2::new(500.0, 50.0));
        let v = tracker.velocity(0.5625);
        assert_eq!(v, DVec2::new(0.0, 800.0));
    }

    #[test]
    fn test_pause_before_release_is_still() {
        let mut tracker = VelocityTracker::new(0.1);
        tracker.push(0.0, DVec2::ZERO);
        tracker.push(0.05, DVec2::new(100.0, 0.0));
        assert_eq!(tracker.velocity(1.0), DVec2::ZERO);
    }
}
