// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline state: clip duration, trim markers, playhead and zoom.
//!
//! All setters clamp, so `0 <= start <= end <= duration` and
//! `0 <= playhead <= duration` hold after every call.

use crate::io::config::Settings;
use crate::util::geometry::Layout;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineModel {
    duration: f64,
    start: f64,
    end: f64,
    playhead: f64,
    pixels_per_second: f64,
    min_pps: f64,
    max_pps: f64,
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::new(120.0, 40.0, 1000.0)
    }
}

fn finite_or_zero(t: f64) -> f64 {
    if t.is_finite() {
        t
    } else {
        0.0
    }
}

impl TimelineModel {
    /// Create an empty timeline with the given zoom and zoom bounds.
    pub fn new(pixels_per_second: f64, min_pps: f64, max_pps: f64) -> Self {
        Self {
            duration: 0.0,
            start: 0.0,
            end: 0.0,
            playhead: 0.0,
            pixels_per_second: pixels_per_second.clamp(min_pps, max_pps),
            min_pps,
            max_pps,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_pps, settings.min_pps, settings.max_pps)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    /// Reset for a newly loaded clip. Zoom is kept.
    pub fn set_clip_duration(&mut self, duration: f64) {
        self.duration = finite_or_zero(duration).max(0.0);
        self.start = 0.0;
        self.end = self.duration;
        self.playhead = 0.0;
    }

    /// Move the start marker, never past the end marker.
    pub fn set_start(&mut self, t: f64) -> f64 {
        self.start = finite_or_zero(t).clamp(0.0, self.end);
        self.start
    }

    /// Move the end marker, never before the start marker.
    pub fn set_end(&mut self, t: f64) -> f64 {
        self.end = finite_or_zero(t).clamp(self.start, self.duration);
        self.end
    }

    pub fn set_playhead(&mut self, t: f64) -> f64 {
        self.playhead = finite_or_zero(t).clamp(0.0, self.duration);
        self.playhead
    }

    /// Pull the playhead back inside `[start, end]`.
    ///
    /// Returns the new position if the playhead had to move.
    pub fn clamp_playhead_to_range(&mut self) -> Option<f64> {
        let clamped = self.playhead.clamp(self.start, self.end);
        if clamped != self.playhead {
            self.playhead = clamped;
            Some(clamped)
        } else {
            None
        }
    }

    /// Where playback has to stop: the end marker or the clip end.
    pub fn stop_bound(&self) -> f64 {
        self.duration.min(self.end)
    }

    pub fn set_zoom(&mut self, pixels_per_second: f64) {
        if pixels_per_second.is_finite() {
            self.pixels_per_second = pixels_per_second.clamp(self.min_pps, self.max_pps);
        }
    }

    /// Apply wheel input: positive steps zoom in, negative zoom out.
    pub fn zoom_wheel(&mut self, steps: i32, factor: f64) {
        if steps == 0 {
            return;
        }
        self.set_zoom(self.pixels_per_second * factor.powi(steps));
    }

    /// Map a 0-100 slider position linearly onto `[lo, hi]`.
    pub fn zoom_from_slider(&mut self, value: f64, lo: f64, hi: f64) {
        let frac = value.clamp(0.0, 100.0) / 100.0;
        self.set_zoom(lo + (hi - lo) * frac);
    }

    /// Slider position that shows the current zoom, for keeping the slider
    /// in step with wheel changes.
    pub fn zoom_slider_position(&self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return 0.0;
        }
        ((self.pixels_per_second - lo) / (hi - lo) * 100.0).clamp(0.0, 100.0)
    }

    /// Layout of this timeline in a widget `width` pixels wide.
    pub fn layout(&self, width: f64, left_padding: f64, right_padding: f64) -> Layout {
        Layout::compute(
            width,
            left_padding,
            right_padding,
            self.pixels_per_second,
            self.duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loaded(duration: f64) -> TimelineModel {
        let mut model = TimelineModel::default();
        model.set_clip_duration(duration);
        model
    }

    #[test]
    fn test_load_resets_markers_but_keeps_zoom() {
        let mut model = loaded(30.0);
        model.set_zoom(300.0);
        model.set_start(5.0);
        model.set_playhead(12.0);

        model.set_clip_duration(8.0);
        assert_eq!(model.start(), 0.0);
        assert_eq!(model.end(), 8.0);
        assert_eq!(model.playhead(), 0.0);
        assert_eq!(model.pixels_per_second(), 300.0);
    }

    #[test]
    fn test_markers_clamp_against_each_other() {
        let mut model = loaded(20.0);
        model.set_end(10.0);
        assert_eq!(model.set_start(15.0), 10.0);
        assert_eq!(model.set_end(4.0), 10.0);
        assert_eq!(model.set_end(25.0), 20.0);
        assert_eq!(model.set_start(-3.0), 0.0);
    }

    #[test]
    fn test_playhead_clamped_to_nearest_bound() {
        let mut model = loaded(20.0);
        model.set_playhead(2.0);
        model.set_start(5.0);
        assert_eq!(model.clamp_playhead_to_range(), Some(5.0));

        model.set_playhead(18.0);
        model.set_end(12.0);
        assert_eq!(model.clamp_playhead_to_range(), Some(12.0));
        assert_eq!(model.clamp_playhead_to_range(), None);
    }

    #[test]
    fn test_wheel_zoom_is_bounded() {
        let mut model = TimelineModel::default();
        model.zoom_wheel(1, 1.15);
        assert!((model.pixels_per_second() - 138.0).abs() < 1e-9);
        model.zoom_wheel(-1, 1.15);
        assert!((model.pixels_per_second() - 120.0).abs() < 1e-9);

        model.zoom_wheel(100, 1.15);
        assert_eq!(model.pixels_per_second(), 1000.0);
        model.zoom_wheel(-100, 1.15);
        assert_eq!(model.pixels_per_second(), 40.0);
    }

    #[test]
    fn test_slider_and_wheel_share_zoom() {
        let mut model = loaded(10.0);
        model.set_end(6.0);
        model.set_playhead(3.0);

        model.zoom_from_slider(50.0, 40.0, 400.0);
        assert_eq!(model.pixels_per_second(), 220.0);
        assert_eq!(model.zoom_slider_position(40.0, 400.0), 50.0);

        model.zoom_wheel(1, 1.15);
        assert!(model.zoom_slider_position(40.0, 400.0) > 50.0);

        // Zoom never touches markers or playhead.
        assert_eq!((model.start(), model.end(), model.playhead()), (0.0, 6.0, 3.0));
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut model = loaded(10.0);
        model.set_playhead(f64::NAN);
        assert_eq!(model.playhead(), 0.0);
        model.set_zoom(f64::INFINITY);
        assert_eq!(model.pixels_per_second(), 120.0);
    }

    proptest! {
        #[test]
        fn markers_stay_ordered(
            duration in 0.0f64..600.0,
            moves in proptest::collection::vec((any::<bool>(), -100.0f64..700.0), 1..40),
        ) {
            let mut model = loaded(duration);
            for (is_start, t) in moves {
                if is_start {
                    model.set_start(t);
                } else {
                    model.set_end(t);
                }
                prop_assert!(0.0 <= model.start());
                prop_assert!(model.start() <= model.end());
                prop_assert!(model.end() <= model.duration());
            }
        }
    }
}
