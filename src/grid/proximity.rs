//! Pointer-proximity magnification.

use bevy::math::Vec2;

use crate::constants::{DEFAULT_MAX_BOOST, DEFAULT_PROXIMITY_RADIUS};

/// Magnification curve: linear falloff from `1 + max_boost` at the pointer
/// to exactly `1.0` at `radius` and beyond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityScale {
    pub radius: f32,
    pub max_boost: f32,
}

impl Default for ProximityScale {
    fn default() -> Self {
        Self {
            radius: DEFAULT_PROXIMITY_RADIUS,
            max_boost: DEFAULT_MAX_BOOST,
        }
    }
}

impl ProximityScale {
    pub fn new(radius: f32, max_boost: f32) -> Self {
        Self { radius, max_boost }
    }

    /// Scale for a cell centered at `center` with the pointer at `pointer`.
    ///
    /// No pointer (cursor outside the window) means no magnification.
    pub fn scale_at(&self, center: Vec2, pointer: Option<Vec2>) -> f32 {
        let Some(pointer) = pointer else {
            return 1.0;
        };
        if self.radius <= 0.0 {
            return 1.0;
        }

        let d2 = pointer.distance_squared(center);
        if d2 > self.radius * self.radius {
            return 1.0;
        }
        1.0 + (1.0 - d2.sqrt() / self.radius) * self.max_boost
    }
}
