mod drag;
mod gesture;
mod momentum;
mod velocity;

pub use drag::PanController;
pub use momentum::{FrictionMode, MomentumSettings};

use gesture::{GestureEvent, PointerGesture, PointerInput};

use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::grid::{FrameSet, GridEngine};

/// Sample the mouse, or the first touch when no mouse button is down.
fn read_pointer(
    window: &Window,
    mouse_button: &ButtonInput<MouseButton>,
    touches: &Touches,
) -> PointerInput {
    if mouse_button.pressed(MouseButton::Left) {
        return PointerInput {
            position: window.cursor_position(),
            pressed: true,
        };
    }
    if let Some(position) = touches.first_pressed_position() {
        return PointerInput {
            position: Some(position),
            pressed: true,
        };
    }
    PointerInput {
        position: window.cursor_position(),
        pressed: false,
    }
}

/// True when the press belongs to egui (a dialog or its buttons)
fn is_pointer_claimed_by_ui(contexts: &mut EguiContexts) -> bool {
    if let Ok(ctx) = contexts.ctx_mut()
        && (ctx.is_pointer_over_area() || ctx.wants_pointer_input())
    {
        return true;
    }
    false
}

fn handle_pointer_input(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    time: Res<Time>,
    mut gesture: ResMut<PointerGesture>,
    mut engine: ResMut<GridEngine>,
    mut contexts: EguiContexts,
) {
    let Ok(window) = window_query.single() else {
        return;
    };

    let input = read_pointer(window, &mouse_button, &touches);
    engine.on_pointer_move(input.position);

    // A rebuild halted the drag under us
    if gesture.is_active() && !engine.pan().is_dragging() {
        gesture.cancel();
    }

    let can_start = !is_pointer_claimed_by_ui(&mut contexts);
    let now = time.elapsed_secs_f64();
    let pan = engine.pan_mut();

    match gesture.update(input, can_start) {
        Some(GestureEvent::Start) => pan.on_drag_start(),
        Some(GestureEvent::Move(delta)) => pan.on_drag_delta(delta),
        Some(GestureEvent::End) => {
            pan.release(now);
            return;
        }
        None => {}
    }

    if let Some(position) = input.position.filter(|_| pan.is_dragging()) {
        pan.record_sample(now, position.as_dvec2());
    }
}

fn step_momentum(time: Res<Time>, mut engine: ResMut<GridEngine>) {
    if !engine.pan().is_coasting() {
        return;
    }
    engine.pan_mut().tick(time.delta_secs_f64());
    if !engine.pan().is_coasting() {
        let offset = engine.pan_offset();
        debug!("Momentum settled at ({:.1}, {:.1})", offset.x, offset.y);
    }
}

/// Grab while idle, grabbing while a drag is held.
fn update_grab_cursor(
    gesture: Res<PointerGesture>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut last: Local<Option<bool>>,
) {
    let dragging = gesture.is_active();
    if *last == Some(dragging) {
        return;
    }
    let Ok(entity) = window_query.single() else {
        return;
    };

    let icon = if dragging {
        SystemCursorIcon::Grabbing
    } else {
        SystemCursorIcon::Grab
    };
    commands.entity(entity).insert(CursorIcon::System(icon));
    *last = Some(dragging);
}

pub struct PanPlugin;

impl Plugin for PanPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerGesture>().add_systems(
            Update,
            (
                handle_pointer_input.in_set(FrameSet::Input),
                update_grab_cursor
                    .in_set(FrameSet::Input)
                    .after(handle_pointer_input),
                step_momentum.in_set(FrameSet::Simulate),
            ),
        );
    }
}
