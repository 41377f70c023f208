// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline widget.
//!
//! Draws the clip box, the trim range with its two marker handles, the
//! playhead and the tick ruler, and feeds pointer and wheel input into
//! the [`Interaction`] state machine.

use crate::io::config::Settings;
use crate::models::interaction::{DragState, Interaction, TimelineEvent};
use crate::models::timeline::TimelineModel;
use crate::util::geometry::{Layout, LayoutMode};
use crate::util::ticks::Ticks;
use crate::util::time::format_hms;
use egui::{pos2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};

const HEIGHT: f32 = 130.0;
const TOP_PADDING: f32 = 10.0;
const BOTTOM_PADDING: f32 = 10.0;
const TICK_HEIGHT: f32 = 10.0;
const HANDLE_HEIGHT: f32 = 12.0;
const HANDLE_HALF_WIDTH: f32 = 6.0;

const BACKGROUND: Color32 = Color32::from_rgb(0x2b, 0x2b, 0x2b);
const CLIP_FILL: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);
const CLIP_BORDER: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
const STRIPE: Color32 = Color32::from_rgb(0x3a, 0x8f, 0xb0);
const SELECTION: Color32 = Color32::from_rgba_premultiplied(0, 56, 90, 90);
const MARKER: Color32 = Color32::from_rgb(0x00, 0xc0, 0xff);
const PLAYHEAD: Color32 = Color32::from_rgb(0xff, 0x55, 0x55);
const TICK: Color32 = Color32::from_gray(0xcc);

/// What happened on the timeline this frame.
#[derive(Debug, Default)]
pub struct TimelineResponse {
    pub events: Vec<TimelineEvent>,
    pub zoom_changed: bool,
}

/// Pointer and wheel input for one frame, in widget-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimelineInput {
    /// Primary button went down on the timeline at this x.
    pub pressed: Option<f64>,
    /// Pointer moved to this x while the button is held.
    pub moved_to: Option<f64>,
    /// Primary button is no longer held.
    pub released: bool,
    /// Wheel notches over the timeline, positive zooms in.
    pub wheel_steps: i32,
}

impl TimelineInput {
    fn read(ui: &egui::Ui, rect: Rect, response: &egui::Response) -> Self {
        let to_local = |pos: Pos2| (pos.x - rect.left()) as f64;
        ui.input(|i| {
            let pointer = i.pointer.interact_pos();
            let scroll = i.raw_scroll_delta.y;
            Self {
                pressed: pointer
                    .filter(|_| i.pointer.primary_pressed() && response.is_pointer_button_down_on())
                    .map(to_local),
                moved_to: pointer
                    .filter(|_| i.pointer.delta() != egui::Vec2::ZERO)
                    .map(to_local),
                released: i.pointer.primary_released() || !i.pointer.primary_down(),
                wheel_steps: if response.hovered() && scroll != 0.0 {
                    scroll.signum() as i32
                } else {
                    0
                },
            }
        })
    }
}

/// Feed one frame of input into the model.
///
/// With `enabled` false the markers and playhead are locked: presses and
/// drags are ignored and any drag in progress is dropped. Wheel zoom
/// still applies.
pub fn apply_input(
    model: &mut TimelineModel,
    interaction: &mut Interaction,
    layout: &Layout,
    settings: &Settings,
    input: &TimelineInput,
    enabled: bool,
) -> TimelineResponse {
    let mut result = TimelineResponse::default();
    if model.duration() <= 0.0 {
        return result;
    }

    if enabled {
        if let Some(x) = input.pressed {
            result.events.extend(interaction.press(model, layout, x));
        }
        if let Some(x) = input.moved_to.filter(|_| interaction.is_dragging()) {
            result.events.extend(interaction.drag_to(model, layout, x));
        }
    }
    if input.released || !enabled {
        interaction.release();
    }

    if input.wheel_steps != 0 {
        model.zoom_wheel(input.wheel_steps, settings.wheel_zoom_factor);
        result.zoom_changed = true;
    }
    result
}

/// Display the timeline and handle pointer/wheel input.
///
/// Markers and playhead only respond to the pointer while `enabled`.
pub fn show(
    ui: &mut egui::Ui,
    model: &mut TimelineModel,
    interaction: &mut Interaction,
    settings: &Settings,
    enabled: bool,
) -> TimelineResponse {
    let desired = egui::vec2(ui.available_width(), HEIGHT);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
    let layout = model.layout(
        rect.width() as f64,
        settings.left_padding,
        settings.right_padding,
    );

    let input = TimelineInput::read(ui, rect, &response);
    let result = apply_input(model, interaction, &layout, settings, &input, enabled);
    if let DragState::Dragging { .. } = interaction.state() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    }

    // Zoom may have changed above; draw with the current layout.
    let layout = model.layout(
        rect.width() as f64,
        settings.left_padding,
        settings.right_padding,
    );
    paint(ui.painter_at(rect), rect, model, &layout, settings);
    result
}

fn paint(painter: egui::Painter, rect: Rect, model: &TimelineModel, layout: &Layout, settings: &Settings) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let usable_h = rect.height() - TOP_PADDING - BOTTOM_PADDING;
    let clip_top = rect.top() + TOP_PADDING + 20.0;
    let clip_h = usable_h - 40.0;
    let clip_bottom = clip_top + clip_h;
    let x = |t: f64| rect.left() + layout.time_to_x(t) as f32;

    // Clip box with decorative stripes.
    let (box_left, box_right) = layout.box_span();
    let clip_rect = Rect::from_min_max(
        pos2(rect.left() + box_left as f32, clip_top),
        pos2(rect.left() + box_right as f32, clip_bottom),
    );
    painter.rect_filled(clip_rect, 4.0, CLIP_FILL);
    painter.rect_stroke(clip_rect, 4.0, Stroke::new(1.0, CLIP_BORDER));
    let mut stripe_x = clip_rect.left();
    while stripe_x < clip_rect.right() {
        let w = 6.0_f32.min(clip_rect.right() - stripe_x);
        painter.rect_filled(
            Rect::from_min_size(pos2(stripe_x, clip_top + 2.0), egui::vec2(w, clip_h - 4.0)),
            0.0,
            STRIPE,
        );
        stripe_x += 18.0;
    }

    if model.duration() > 0.0 {
        // Selected range.
        let start_x = x(model.start());
        let end_x = x(model.end());
        let selection = Rect::from_min_size(
            pos2(start_x, clip_top),
            egui::vec2((end_x - start_x).max(2.0), clip_h),
        );
        painter.rect_filled(selection, 0.0, SELECTION);

        // Marker lines and handles: start above the box, end below.
        let marker = Stroke::new(2.0, MARKER);
        painter.line_segment([pos2(start_x, clip_top), pos2(start_x, clip_bottom)], marker);
        painter.line_segment([pos2(end_x, clip_top), pos2(end_x, clip_bottom)], marker);
        let above = clip_top - 2.0;
        painter.add(Shape::convex_polygon(
            vec![
                pos2(start_x - HANDLE_HALF_WIDTH, above),
                pos2(start_x, above - HANDLE_HEIGHT),
                pos2(start_x + HANDLE_HALF_WIDTH, above),
            ],
            MARKER,
            Stroke::NONE,
        ));
        let below = clip_bottom + 2.0;
        painter.add(Shape::convex_polygon(
            vec![
                pos2(end_x, below),
                pos2(end_x + HANDLE_HALF_WIDTH, below + HANDLE_HEIGHT),
                pos2(end_x - HANDLE_HALF_WIDTH, below + HANDLE_HEIGHT),
            ],
            MARKER,
            Stroke::NONE,
        ));

        // Playhead.
        let ph_x = x(model.playhead());
        painter.line_segment(
            [pos2(ph_x, clip_top - 6.0), pos2(ph_x, clip_bottom + 6.0)],
            Stroke::new(2.0, PLAYHEAD),
        );

        // Tick ruler.
        let tick_y = clip_bottom + 10.0;
        for tick in Ticks::new(*layout, settings.tick_target_px) {
            let tx = rect.left() + tick.x as f32;
            painter.line_segment(
                [pos2(tx, tick_y), pos2(tx, tick_y + TICK_HEIGHT)],
                Stroke::new(1.0, TICK),
            );
            painter.text(
                pos2(tx, tick_y + TICK_HEIGHT + 2.0),
                Align2::CENTER_TOP,
                tick.label,
                FontId::proportional(10.0),
                TICK,
            );
        }
    }

    // Summary labels.
    painter.text(
        pos2(rect.left() + 8.0, rect.top() + 4.0),
        Align2::LEFT_TOP,
        format!("Clip: {}", format_hms(model.duration())),
        FontId::proportional(12.0),
        Color32::WHITE,
    );
    let zoom_label = match layout.mode {
        LayoutMode::Fit => format!("Zoom: {:.0} px/s", layout.scale),
        LayoutMode::Scroll => "Zoom: whole clip".to_string(),
    };
    painter.text(
        pos2(rect.center().x, rect.top() + 4.0),
        Align2::CENTER_TOP,
        zoom_label,
        FontId::proportional(11.0),
        Color32::from_gray(0x99),
    );
    painter.text(
        pos2(rect.right() - 8.0, rect.top() + 4.0),
        Align2::RIGHT_TOP,
        format!("Playhead: {}", format_hms(model.playhead())),
        FontId::proportional(12.0),
        Color32::WHITE,
    );
}
