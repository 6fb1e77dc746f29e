mod dialogs;
mod overlay;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            EguiPrimaryContextPass,
            (
                // Overlay first so dialogs draw on top of it
                overlay::instruction_overlay_ui,
                (
                    dialogs::config_reset_notification_ui,
                    dialogs::grid_build_error_ui,
                ),
            )
                .chain(),
        );
    }
}
