use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::ConfigResetNotification;
use crate::grid::GridBuildError;

/// Shown once at startup if the config file could not be used
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuration Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Grid settings were reset to their defaults.");

            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }

            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });

    Ok(())
}

/// Explains an empty grid. Stays up until a rebuild succeeds.
pub fn grid_build_error_ui(
    mut contexts: EguiContexts,
    build_error: Res<GridBuildError>,
) -> Result {
    let Some(ref message) = build_error.message else {
        return Ok(());
    };

    egui::Window::new("Nothing to Show")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(message);
            ui.add_space(5.0);
            ui.label(
                egui::RichText::new("Add images to the gallery folder and restart.").weak(),
            );
        });

    Ok(())
}
