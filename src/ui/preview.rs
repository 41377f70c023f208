// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview area for the frame under the playhead.
//!
//! A frame that failed to decode is replaced by a placeholder; playback
//! carries on regardless.

use crate::io::media::Frame;
use image::imageops::{self, FilterType};

/// Largest frame edge uploaded as a texture. Bigger frames are scaled down.
pub const MAX_TEXTURE_EDGE: u32 = 1920;

/// Scale `frame` down (bilinear) so it fits within `max_w` x `max_h`,
/// keeping its aspect ratio. Smaller frames are returned unchanged.
pub fn fit_frame(frame: Frame, max_w: u32, max_h: u32) -> Frame {
    let (w, h) = frame.dimensions();
    if w <= max_w && h <= max_h {
        return frame;
    }
    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    imageops::resize(&frame, new_w, new_h, FilterType::Triangle)
}

/// Convert a frame into an egui image.
pub fn to_color_image(frame: &Frame) -> egui::ColorImage {
    let size = [frame.width() as usize, frame.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw())
}

/// Display the preview area.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    frame_size: Option<(u32, u32)>,
    decode_error: Option<&str>,
    loading_message: Option<&str>,
) {
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style())
        .fill(egui::Color32::from_gray(17))
        .show(ui, |ui| {
            ui.set_min_size(available_size);

            if let Some(message) = loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
                return;
            }

            if let Some(error) = decode_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Preview unavailable: {}", error))
                            .color(egui::Color32::from_gray(170)),
                    );
                });
                return;
            }

            let (Some(texture), Some((frame_w, frame_h))) = (texture, frame_size) else {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("Trimline")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new("Open or drop a clip to begin trimming")
                                .color(egui::Color32::from_gray(180)),
                        );
                        ui.label(
                            egui::RichText::new("File > Open Clip...")
                                .weak()
                                .color(egui::Color32::from_gray(130)),
                        );
                    });
                });
                return;
            };

            // Fit the frame in the available space, centered.
            let available = ui.available_size();
            let frame_aspect = frame_w as f32 / frame_h.max(1) as f32;
            let available_aspect = available.x / available.y.max(1.0);

            let (display_width, display_height) = if frame_aspect > available_aspect {
                (available.x, available.x / frame_aspect)
            } else {
                (available.y * frame_aspect, available.y)
            };

            let x_offset = (available.x - display_width) / 2.0;
            let y_offset = (available.y - display_height) / 2.0;
            let image_rect = egui::Rect::from_min_size(
                ui.min_rect().min + egui::vec2(x_offset, y_offset),
                egui::vec2(display_width, display_height),
            );

            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_small_frame_untouched() {
        let frame = Frame::from_pixel(320, 240, Rgba([1, 2, 3, 255]));
        let fitted = fit_frame(frame.clone(), MAX_TEXTURE_EDGE, MAX_TEXTURE_EDGE);
        assert_eq!(fitted, frame);
    }

    #[test]
    fn test_large_frame_scaled_keeping_aspect() {
        let frame = Frame::from_pixel(3840, 1600, Rgba([9, 9, 9, 255]));
        let fitted = fit_frame(frame, 1920, 1920);
        assert_eq!(fitted.dimensions(), (1920, 800));
    }

    #[test]
    fn test_color_image_size() {
        let frame = Frame::new(4, 3);
        let image = to_color_image(&frame);
        assert_eq!(image.size, [4, 3]);
    }
}
