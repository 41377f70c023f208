// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time <-> pixel mapping for the timeline.
//!
//! The timeline has two layout regimes. When the whole clip fits in the
//! usable width at the current zoom, the clip box is centered and drawn
//! at exactly `pps` pixels per second ("fit" mode). Otherwise the clip
//! box is stretched across the usable width and the effective scale is
//! `usable / duration` ("scroll" mode).
//!
//! A [`Layout`] is computed once per render pass and both directions of
//! the mapping are pure functions of it, so they cannot drift apart.

/// Narrowest usable width the timeline will lay out into.
pub const MIN_USABLE_WIDTH: f64 = 10.0;

/// Guard against division by a zero duration or scale.
const EPSILON: f64 = 1e-6;

/// Which layout regime a [`Layout`] was computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Fit,
    Scroll,
}

/// Horizontal placement of the clip box for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    /// Pixel x of `t = 0`.
    pub origin_x: f64,
    /// Effective pixels per second.
    pub scale: f64,
    /// Width of the rendered clip box in pixels.
    pub box_width: f64,
    /// Clip duration the layout was computed for.
    pub duration: f64,
}

impl Layout {
    /// Compute the layout for a widget of `widget_width` pixels.
    pub fn compute(
        widget_width: f64,
        left_padding: f64,
        right_padding: f64,
        pixels_per_second: f64,
        duration: f64,
    ) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        let usable = (widget_width - left_padding - right_padding).max(MIN_USABLE_WIDTH);
        let total_width = pixels_per_second * duration.max(1.0);

        if total_width <= usable {
            Self {
                mode: LayoutMode::Fit,
                origin_x: left_padding + (usable - total_width) / 2.0,
                scale: pixels_per_second,
                box_width: total_width,
                duration,
            }
        } else {
            Self {
                mode: LayoutMode::Scroll,
                origin_x: left_padding,
                scale: usable / duration.max(EPSILON),
                box_width: usable,
                duration,
            }
        }
    }

    /// Pixel x for a time in seconds.
    pub fn time_to_x(&self, t: f64) -> f64 {
        self.origin_x + t * self.scale
    }

    /// Time in seconds for a pixel x, always clamped to `[0, duration]`.
    pub fn x_to_time(&self, x: f64) -> f64 {
        let t = (x - self.origin_x) / self.scale.max(EPSILON);
        if t.is_finite() {
            t.clamp(0.0, self.duration)
        } else {
            0.0
        }
    }

    /// Left and right pixel edges of the clip box.
    pub fn box_span(&self) -> (f64, f64) {
        (self.origin_x, self.origin_x + self.box_width)
    }
}
