// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Trim range panel: marker readouts, zoom slider and range actions.

use crate::util::time::format_hms;

/// Result of panel interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkersAction {
    None,
    /// Zoom slider moved to this 0-100 position.
    Zoom(f64),
    Export,
    CutToSelection,
}

/// Display the panel. `zoom_position` is the slider's 0-100 value.
pub fn show(
    ui: &mut egui::Ui,
    start: f64,
    end: f64,
    zoom_position: &mut f64,
    range_actions_enabled: bool,
) -> MarkersAction {
    let mut action = MarkersAction::None;

    ui.heading("Range");
    ui.label(format!("Start: {}", format_hms(start)));
    ui.label(format!("End: {}", format_hms(end)));
    ui.label(
        egui::RichText::new(format!("Length: {:.2}s", (end - start).max(0.0)))
            .weak(),
    );

    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Zoom");
        let slider = egui::Slider::new(zoom_position, 0.0..=100.0).show_value(false);
        if ui.add(slider).changed() {
            action = MarkersAction::Zoom(*zoom_position);
        }
    });

    ui.separator();

    if ui
        .add_enabled(range_actions_enabled, egui::Button::new("Export Trimmed..."))
        .on_hover_text("Write the selected range to a new file")
        .clicked()
    {
        action = MarkersAction::Export;
    }
    if ui
        .add_enabled(range_actions_enabled, egui::Button::new("Cut to Selection"))
        .on_hover_text("Replace the loaded clip with the selected range")
        .clicked()
    {
        action = MarkersAction::CutToSelection;
    }

    action
}
