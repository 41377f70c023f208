// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transport controls.
//!
//! Play/pause, stop, stepping, and the millisecond seek slider.

use crate::models::playback::PlaybackState;
use crate::util::time::format_hms;

/// Result of transport interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportAction {
    None,
    TogglePlay,
    Stop,
    Step(f64),
    Seek(f64),
}

/// Display the transport row.
///
/// Controls are disabled while `enabled` is false (no clip, or an export
/// in flight).
pub fn show(
    ui: &mut egui::Ui,
    enabled: bool,
    state: PlaybackState,
    playhead: f64,
    duration: f64,
    step_seconds: f64,
) -> TransportAction {
    let mut action = TransportAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let play_label = match state {
            PlaybackState::Playing => "❚❚ Pause",
            PlaybackState::Paused => "▶ Resume",
            PlaybackState::Stopped => "▶ Play",
        };
        if ui.add_enabled(enabled, egui::Button::new(play_label)).clicked() {
            action = TransportAction::TogglePlay;
        }
        if ui.add_enabled(enabled, egui::Button::new("◼ Stop")).clicked() {
            action = TransportAction::Stop;
        }

        ui.separator();

        let back = format!("◀ {}s", step_seconds);
        if ui.add_enabled(enabled, egui::Button::new(back)).clicked() {
            action = TransportAction::Step(-step_seconds);
        }
        let forward = format!("{}s ▶", step_seconds);
        if ui.add_enabled(enabled, egui::Button::new(forward)).clicked() {
            action = TransportAction::Step(step_seconds);
        }

        ui.separator();

        ui.label(
            egui::RichText::new(format!("{} / {}", format_hms(playhead), format_hms(duration)))
                .monospace(),
        );
    });

    ui.horizontal(|ui| {
        ui.label("Seek");
        let max_ms = (duration * 1000.0).ceil().max(1.0) as u64;
        let mut value_ms = (playhead * 1000.0).round().max(0.0) as u64;
        ui.spacing_mut().slider_width = (ui.available_width() - 16.0).max(50.0);
        let slider = egui::Slider::new(&mut value_ms, 0..=max_ms).show_value(false);
        if ui.add_enabled(enabled, slider).changed() {
            action = TransportAction::Seek(value_ms as f64 / 1000.0);
        }
    });

    action
}
