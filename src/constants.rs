//! Centralized constants used across the application.
//!
//! Tunable values here are the defaults; most of them can be overridden
//! through the config file (see [`crate::config::GridConfigData`]).

use bevy::color::Color;

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Side length of one square grid cell in pixels
pub const DEFAULT_CELL_SIZE: u32 = 280;

/// Gap between neighbouring cells in pixels
pub const DEFAULT_GAP: u32 = 20;

/// Largest accepted cell size plus gap, in pixels
pub const MAX_CELL_PITCH: u32 = 4096;

/// Extra columns/rows beyond what the viewport needs, so panning never
/// exposes empty space
pub const OVERFILL_MARGIN: u32 = 4;

/// Multiplicative velocity decay applied per nominal tick
pub const DEFAULT_FRICTION: f64 = 0.92;

/// Momentum stops once both velocity components fall to this (pixels/second)
pub const DEFAULT_MIN_VELOCITY: f64 = 0.5;

/// Timestep one friction application corresponds to (60 fps)
pub const NOMINAL_TIMESTEP: f64 = 0.016;

/// Upper bound on a single momentum step, so a stalled frame doesn't fling the grid
pub const MAX_MOMENTUM_STEP: f64 = 0.1;

/// Pointer samples older than this are ignored when estimating release velocity
pub const VELOCITY_WINDOW_SECS: f64 = 0.1;

/// Distance from a cell center beyond which no magnification applies
pub const DEFAULT_PROXIMITY_RADIUS: f32 = 350.0;

/// Extra scale applied to a cell whose center is exactly under the pointer
pub const DEFAULT_MAX_BOOST: f32 = 0.12;

/// Delay between every image resolving and the grid being revealed
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 400;

/// Default directory (relative to the Bevy assets folder) scanned for images
pub const DEFAULT_GALLERY_DIR: &str = "gallery";

/// Window clear color behind the cells
pub const BACKGROUND_COLOR: Color = Color::srgb(0.06, 0.06, 0.07);
