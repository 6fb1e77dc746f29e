//! Post-release momentum with exponential friction.
//!
//! Idle until started with a release velocity, then each step decays the
//! velocity and moves the pan offset, until both velocity components are at
//! or below the minimum. A new drag cancels it outright.

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FRICTION, DEFAULT_MIN_VELOCITY, MAX_MOMENTUM_STEP, NOMINAL_TIMESTEP,
};

/// How friction is applied per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionMode {
    /// One friction multiplication and one nominal timestep per frame,
    /// regardless of how long the frame took. Decay speed follows frame rate.
    FixedStep,
    /// Friction raised to `elapsed / nominal_timestep`, offset advanced by the
    /// real elapsed time. Same decay curve at any frame rate.
    #[default]
    ElapsedTime,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumSettings {
    /// Velocity multiplier per nominal timestep, in (0, 1)
    pub friction: f64,
    /// Pixels per second at or below which motion stops
    pub min_velocity: f64,
    pub nominal_timestep: f64,
    pub mode: FrictionMode,
}

impl Default for MomentumSettings {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            min_velocity: DEFAULT_MIN_VELOCITY,
            nominal_timestep: NOMINAL_TIMESTEP,
            mode: FrictionMode::default(),
        }
    }
}

impl MomentumSettings {
    /// True when either axis is fast enough to keep (or start) coasting.
    pub fn exceeds_threshold(&self, velocity: DVec2) -> bool {
        velocity.x.abs() > self.min_velocity || velocity.y.abs() > self.min_velocity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MomentumState {
    #[default]
    Idle,
    Running {
        velocity: DVec2,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MomentumSimulator {
    pub settings: MomentumSettings,
    state: MomentumState,
}

impl MomentumSimulator {
    pub fn new(settings: MomentumSettings) -> Self {
        Self {
            settings,
            state: MomentumState::Idle,
        }
    }

    pub fn state(&self) -> MomentumState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, MomentumState::Running { .. })
    }

    /// Begin coasting at `velocity` (pixels/second). Returns whether motion
    /// actually started; slow releases leave the simulator idle.
    pub fn start(&mut self, velocity: DVec2) -> bool {
        if self.settings.exceeds_threshold(velocity) {
            self.state = MomentumState::Running { velocity };
            true
        } else {
            self.state = MomentumState::Idle;
            false
        }
    }

    /// Drop any remaining velocity.
    pub fn cancel(&mut self) {
        self.state = MomentumState::Idle;
    }

    /// Advance one frame that took `elapsed` seconds, moving `offset`.
    ///
    /// Returns `true` while still running afterwards.
    pub fn step(&mut self, elapsed: f64, offset: &mut DVec2) -> bool {
        let MomentumState::Running { mut velocity } = self.state else {
            return false;
        };

        let (decay, dt) = match self.settings.mode {
            FrictionMode::FixedStep => (self.settings.friction, self.settings.nominal_timestep),
            FrictionMode::ElapsedTime => {
                let dt = elapsed.clamp(0.0, MAX_MOMENTUM_STEP);
                let ticks = dt / self.settings.nominal_timestep;
                (self.settings.friction.powf(ticks), dt)
            }
        };

        velocity *= decay;
        *offset += velocity * dt;

        if self.settings.exceeds_threshold(velocity) {
            self.state = MomentumState::Running { velocity };
            true
        } else {
            self.state = MomentumState::Idle;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_step() -> MomentumSimulator {
        MomentumSimulator::new(MomentumSettings {
            mode: FrictionMode::FixedStep,
            ..Default::default()
        })
    }

    fn run_to_idle(sim: &mut MomentumSimulator, elapsed: f64) -> (usize, DVec2) {
        let mut offset = DVec2::ZERO;
        let mut ticks = 0;
        while sim.step(elapsed, &mut offset) {
            ticks += 1;
            assert!(ticks < 10_000, "momentum never settled");
        }
        (ticks + 1, offset)
    }

    #[test]
    fn test_starts_idle() {
        let sim = MomentumSimulator::default();
        assert_eq!(sim.state(), MomentumState::Idle);
    }

    #[test]
    fn test_slow_release_stays_idle() {
        let mut sim = MomentumSimulator::default();
        assert!(!sim.start(DVec2::new(0.5, -0.5)));
        assert!(!sim.is_running());
    }

    #[test]
    fn test_either_axis_starts_motion() {
        let mut sim = MomentumSimulator::default();
        assert!(sim.start(DVec2::new(0.0, -0.6)));
        assert!(sim.is_running());
    }

    #[test]
    fn test_reference_decay_terminates_in_36_ticks() {
        let mut sim = fixed_step();
        sim.start(DVec2::new(10.0, 0.0));
        let (ticks, _) = run_to_idle(&mut sim, 1.0 / 144.0);
        assert_eq!(ticks, 36);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_fixed_step_first_tick_matches_formula() {
        let mut sim = fixed_step();
        sim.start(DVec2::new(1000.0, -500.0));
        let mut offset = DVec2::new(5.0, 5.0);
        sim.step(0.5, &mut offset);
        // friction first, then one nominal timestep of motion
        assert!((offset.x - (5.0 + 920.0 * 0.016)).abs() < 1e-9);
        assert!((offset.y - (5.0 - 460.0 * 0.016)).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_time_is_frame_rate_independent() {
        let v = DVec2::new(2000.0, 800.0);

        let mut at_60 = MomentumSimulator::default();
        at_60.start(v);
        let mut offset_60 = DVec2::ZERO;
        for _ in 0..60 {
            at_60.step(1.0 / 60.0, &mut offset_60);
        }

        let mut at_120 = MomentumSimulator::default();
        at_120.start(v);
        let mut offset_120 = DVec2::ZERO;
        for _ in 0..120 {
            at_120.step(1.0 / 120.0, &mut offset_120);
        }

        let MomentumState::Running { velocity: v60 } = at_60.state() else {
            panic!("60 fps run settled early");
        };
        let MomentumState::Running { velocity: v120 } = at_120.state() else {
            panic!("120 fps run settled early");
        };
        // Same decay after one second of wall time
        assert!((v60 - v120).length() < 1e-6);
        // Explicit Euler differs slightly by step size; distances stay close
        assert!((offset_60 - offset_120).length() < offset_60.length() * 0.05);
    }

    #[test]
    fn test_elapsed_time_clamps_long_frames() {
        let mut sim = MomentumSimulator::default();
        sim.start(DVec2::new(1000.0, 0.0));
        let mut offset = DVec2::ZERO;
        sim.step(5.0, &mut offset);
        assert!(offset.x < 1000.0 * MAX_MOMENTUM_STEP);
    }

    #[test]
    fn test_zero_elapsed_does_not_move() {
        let mut sim = MomentumSimulator::default();
        sim.start(DVec2::new(1000.0, 0.0));
        let mut offset = DVec2::ZERO;
        assert!(sim.step(0.0, &mut offset));
        assert_eq!(offset, DVec2::ZERO);
    }

    #[test]
    fn test_cancel_discards_velocity() {
        let mut sim = MomentumSimulator::default();
        sim.start(DVec2::new(1000.0, 1000.0));
        sim.cancel();
        let mut offset = DVec2::ZERO;
        assert!(!sim.step(1.0 / 60.0, &mut offset));
        assert_eq!(offset, DVec2::ZERO);
    }

    #[test]
    fn test_negative_velocity_moves_backwards() {
        let mut sim = MomentumSimulator::default();
        sim.start(DVec2::new(-800.0, 0.0));
        let (_, offset) = run_to_idle(&mut sim, 1.0 / 60.0);
        assert!(offset.x < 0.0);
        assert_eq!(offset.y, 0.0);
    }
}
