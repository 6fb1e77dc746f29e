//! Reduces per-frame pointer state (mouse or first touch) to drag events.

use bevy::math::{DVec2, Vec2};
use bevy::prelude::Resource;

/// Pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    /// Screen-space position, `None` when outside the window
    pub position: Option<Vec2>,
    /// Primary button or a finger is down
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start,
    /// Screen-space movement since the previous frame
    Move(DVec2),
    End,
}

#[derive(Resource, Debug, Default)]
pub struct PointerGesture {
    active: bool,
    was_pressed: bool,
    last: Option<Vec2>,
}

impl PointerGesture {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drop the active drag without emitting `End`. The press that was
    /// held stays consumed; only a fresh press starts a new drag.
    pub fn cancel(&mut self) {
        self.active = false;
        self.last = None;
    }

    /// Feed this frame's pointer state.
    ///
    /// A drag starts on the press edge when `can_start` allows it (the press
    /// is not aimed at UI) and the pointer is inside the window. Leaving the
    /// window mid-drag pauses movement without ending the drag; coming back
    /// resumes from the new position rather than jumping.
    pub fn update(&mut self, input: PointerInput, can_start: bool) -> Option<GestureEvent> {
        let just_pressed = input.pressed && !self.was_pressed;
        self.was_pressed = input.pressed;

        if !self.active {
            if just_pressed && can_start && input.position.is_some() {
                self.active = true;
                self.last = input.position;
                return Some(GestureEvent::Start);
            }
            return None;
        }

        if !input.pressed {
            self.active = false;
            self.last = None;
            return Some(GestureEvent::End);
        }

        let Some(position) = input.position else {
            self.last = None;
            return None;
        };
        let previous = self.last.replace(position)?;
        let delta = (position - previous).as_dvec2();
        if delta == DVec2::ZERO {
            return None;
        }
        Some(GestureEvent::Move(delta))
    }
}
