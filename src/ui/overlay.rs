use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

const INSTRUCTION_TEXT: &str = "Drag anywhere to explore the infinite grid";

/// Translucent hint pinned to the top center. Never takes pointer input, so
/// a press on it still starts a drag.
pub fn instruction_overlay_ui(mut contexts: EguiContexts) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Area::new(egui::Id::new("instruction_overlay"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_black_alpha(140))
                .corner_radius(16.0)
                .inner_margin(egui::Margin::symmetric(16, 8))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(INSTRUCTION_TEXT)
                            .color(egui::Color32::from_white_alpha(220))
                            .size(14.0),
                    );
                });
        });

    Ok(())
}
