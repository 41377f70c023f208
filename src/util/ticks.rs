// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tick marks along the bottom of the timeline.
//!
//! The tick interval is chosen so ticks land roughly `target_px` apart on
//! screen, then snapped to a human-friendly step.

use super::geometry::Layout;
use super::time::format_hms;

/// Candidate tick intervals in seconds, in preference order for ties.
pub const NICE_STEPS: [f64; 10] = [1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0];

/// Slack so a tick exactly at the clip end is not lost to rounding.
const END_EPSILON: f64 = 1e-4;

/// Snap a raw interval to the closest entry of [`NICE_STEPS`].
///
/// On equal distance the earlier (smaller) step wins.
pub fn nice_step(raw: f64) -> f64 {
    let mut best = NICE_STEPS[0];
    for &step in &NICE_STEPS[1..] {
        if (step - raw).abs() < (best - raw).abs() {
            best = step;
        }
    }
    best
}

/// Raw seconds-per-tick for the given layout, before snapping.
pub fn raw_seconds_per_tick(layout: &Layout, target_px: f64) -> f64 {
    let px_per_second = layout.box_width / layout.duration.max(1.0);
    (target_px / px_per_second.max(1e-6)).max(1.0)
}

/// One tick mark.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub time: f64,
    pub x: f64,
    pub label: String,
}

/// Lazy, finite sequence of ticks at `0, step, 2*step, ...` up to the clip end.
///
/// Cloning yields an independent iterator starting from the same position.
#[derive(Debug, Clone)]
pub struct Ticks {
    layout: Layout,
    step: f64,
    index: u64,
}

impl Ticks {
    pub fn new(layout: Layout, target_px: f64) -> Self {
        Self {
            layout,
            step: nice_step(raw_seconds_per_tick(&layout, target_px)),
            index: 0,
        }
    }

    fn remaining(&self) -> usize {
        let last = ((self.layout.duration + END_EPSILON) / self.step).floor() as u64;
        let count = last.saturating_add(1).saturating_sub(self.index);
        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        // Multiply rather than accumulate so long clips don't drift.
        let time = self.index as f64 * self.step;
        if time > self.layout.duration + END_EPSILON {
            return None;
        }
        self.index += 1;
        Some(Tick {
            time,
            x: self.layout.time_to_x(time),
            label: format_hms(time),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Ticks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_step_snapping() {
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(3.4), 2.0);
        assert_eq!(nice_step(27.98), 30.0);
        assert_eq!(nice_step(44.0), 30.0);
        assert_eq!(nice_step(5000.0), 600.0);
    }

    #[test]
    fn test_nice_step_tie_prefers_earlier() {
        // 3.5 is equidistant from 2 and 5.
        assert_eq!(nice_step(3.5), 2.0);
        // 12.5 is equidistant from 10 and 15.
        assert_eq!(nice_step(12.5), 10.0);
    }

    #[test]
    fn test_ticks_for_125_second_clip() {
        // usable = 536 px for 125 s -> ~28 s raw, snapped to 30 s.
        let layout = Layout::compute(636.0, 50.0, 50.0, 120.0, 125.0);
        let raw = raw_seconds_per_tick(&layout, 120.0);
        assert!((raw - 27.98).abs() < 0.01);

        let ticks: Vec<Tick> = Ticks::new(layout, 120.0).collect();
        let times: Vec<f64> = ticks.iter().map(|t| t.time).collect();
        assert_eq!(times, vec![0.0, 30.0, 60.0, 90.0, 120.0]);
        assert_eq!(ticks[0].label, "0:00");
        assert_eq!(ticks[4].label, "2:00");
        assert!(ticks.iter().all(|t| t.time <= 125.0));
        assert_eq!(ticks[0].x, layout.origin_x);
    }

    #[test]
    fn test_ticks_are_restartable() {
        let layout = Layout::compute(1000.0, 50.0, 50.0, 120.0, 5.0);
        let mut ticks = Ticks::new(layout, 120.0);
        assert_eq!(ticks.step, 1.0);
        assert_eq!(ticks.len(), 6);

        let snapshot = ticks.clone();
        ticks.next();
        ticks.next();
        assert_eq!(ticks.len(), 4);
        assert_eq!(snapshot.count(), 6);
    }

    #[test]
    fn test_tick_at_exact_end_is_kept() {
        let layout = Layout::compute(1000.0, 50.0, 50.0, 120.0, 4.0);
        let last = Ticks::new(layout, 120.0).last().unwrap();
        assert_eq!(last.time, 4.0);
    }

    #[test]
    fn test_size_hint_saturates_for_huge_duration() {
        let layout = Layout::compute(1000.0, 50.0, 50.0, 120.0, 1e300);
        let ticks = Ticks::new(layout, 120.0);
        assert_eq!(ticks.size_hint(), (usize::MAX, Some(usize::MAX)));
        assert_eq!(ticks.take(3).map(|t| t.time).collect::<Vec<_>>(), vec![0.0, 600.0, 1200.0]);
    }

    #[test]
    fn test_empty_clip_has_single_tick() {
        let layout = Layout::compute(1000.0, 50.0, 50.0, 120.0, 0.0);
        let ticks: Vec<Tick> = Ticks::new(layout, 120.0).collect();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].time, 0.0);
    }
}
