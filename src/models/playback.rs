// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback timing.
//!
//! The playhead position while playing is derived from wall-clock time
//! since the last play/seek anchor, never accumulated per tick, so the
//! clock does not drift whatever the tick rate.
//!
//! Two tasks run at their own cadence: the clock tick (cheap) and the
//! preview-frame fetch (expensive). They share the playhead through a
//! [`SharedPlayhead`].

use super::timeline::TimelineModel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Outcome of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockTick {
    /// Not playing; nothing changed.
    Idle,
    /// Playhead moved to the given time.
    Advanced(f64),
    /// Playback reached the end marker (or clip end) and stopped there.
    ReachedEnd(f64),
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: PlaybackState,
    offset: f64,
    started_at: Option<Instant>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            offset: 0.0,
            started_at: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Start playing from `from` seconds.
    pub fn play(&mut self, from: f64, now: Instant) {
        self.state = PlaybackState::Playing;
        self.offset = from;
        self.started_at = Some(now);
        log::info!("Playback started at {:.3}s", from);
    }

    /// Derived position at `now`, or `None` unless playing.
    pub fn position(&self, now: Instant) -> Option<f64> {
        match (self.state, self.started_at) {
            (PlaybackState::Playing, Some(started_at)) => {
                Some(self.offset + now.saturating_duration_since(started_at).as_secs_f64())
            }
            _ => None,
        }
    }

    /// Advance the playhead, stopping at the end marker or clip end.
    pub fn tick(&mut self, model: &mut TimelineModel, now: Instant) -> ClockTick {
        let Some(position) = self.position(now) else {
            return ClockTick::Idle;
        };

        let bound = model.stop_bound();
        if position >= bound {
            self.state = PlaybackState::Stopped;
            self.started_at = None;
            self.offset = bound;
            let stopped_at = model.set_playhead(bound);
            log::info!("Playback reached {:.3}s and stopped", stopped_at);
            return ClockTick::ReachedEnd(stopped_at);
        }
        ClockTick::Advanced(model.set_playhead(position))
    }

    /// Freeze the playhead at the current derived position.
    pub fn pause(&mut self, model: &mut TimelineModel, now: Instant) {
        let Some(position) = self.position(now) else {
            return;
        };
        let position = model.set_playhead(position.min(model.stop_bound()));
        self.state = PlaybackState::Paused;
        self.offset = position;
        self.started_at = None;
        log::info!("Playback paused at {:.3}s", position);
    }

    /// Re-anchor after a seek so playback continues from `t` without a jump.
    pub fn seek(&mut self, t: f64, now: Instant) {
        if self.is_playing() {
            self.offset = t;
            self.started_at = Some(now);
        }
    }

    /// Stop and rewind to the beginning of the clip.
    pub fn stop(&mut self, model: &mut TimelineModel) {
        self.state = PlaybackState::Stopped;
        self.offset = 0.0;
        self.started_at = None;
        model.set_playhead(0.0);
        log::info!("Playback stopped");
    }
}

/// Gate for a task that should run at most once per `interval`.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    last: Option<Instant>,
}

impl Cadence {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz.max(1) as f64))
    }

    /// True (and re-armed) if the task should run at `now`.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left until the task is next due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

/// Playhead position readable from any task, stored as f64 bits.
#[derive(Debug, Clone, Default)]
pub struct SharedPlayhead(Arc<AtomicU64>);

impl SharedPlayhead {
    pub fn new(t: f64) -> Self {
        Self(Arc::new(AtomicU64::new(t.to_bits())))
    }

    pub fn store(&self, t: f64) {
        self.0.store(t.to_bits(), Ordering::Release);
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
}

/// Throttled preview refresh: fetches when due and the playhead moved.
#[derive(Debug, Clone)]
pub struct PreviewTask {
    cadence: Cadence,
    playhead: SharedPlayhead,
    last_fetched: Option<f64>,
}

impl PreviewTask {
    pub fn new(preview_fps: u32, playhead: SharedPlayhead) -> Self {
        Self {
            cadence: Cadence::from_hz(preview_fps),
            playhead,
            last_fetched: None,
        }
    }

    /// Force the next due poll to fetch even if the playhead is unchanged.
    pub fn invalidate(&mut self) {
        self.last_fetched = None;
    }

    /// The time to fetch a frame for, if a fetch should happen now.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        let t = self.playhead.load();
        if self.last_fetched == Some(t) || !self.cadence.due(now) {
            return None;
        }
        self.last_fetched = Some(t);
        Some(t)
    }

    /// Whether the playhead moved since the last fetch.
    pub fn is_stale(&self) -> bool {
        self.last_fetched != Some(self.playhead.load())
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.cadence.time_until_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn loaded(duration: f64) -> TimelineModel {
        let mut model = TimelineModel::default();
        model.set_clip_duration(duration);
        model
    }

    #[test]
    fn test_position_derived_from_wall_clock() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        assert_eq!(clock.position(t0), None);

        clock.play(2.0, t0);
        let p = clock.position(t0 + ms(1500)).unwrap();
        assert!((p - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_auto_stop_at_end_marker() {
        let t0 = Instant::now();
        let mut model = loaded(10.0);
        model.set_end(5.0);
        let mut clock = PlaybackClock::new();
        clock.play(0.0, t0);

        assert_eq!(clock.tick(&mut model, t0 + ms(4000)), ClockTick::Advanced(4.0));
        assert_eq!(clock.tick(&mut model, t0 + ms(5200)), ClockTick::ReachedEnd(5.0));
        assert_eq!(clock.state(), PlaybackState::Stopped);
        assert_eq!(model.playhead(), 5.0);

        // Further ticks leave the playhead alone.
        assert_eq!(clock.tick(&mut model, t0 + ms(9000)), ClockTick::Idle);
        assert_eq!(model.playhead(), 5.0);
    }

    #[test]
    fn test_auto_stop_at_clip_end() {
        let t0 = Instant::now();
        let mut model = loaded(3.0);
        let mut clock = PlaybackClock::new();
        clock.play(2.5, t0);
        assert_eq!(clock.tick(&mut model, t0 + ms(600)), ClockTick::ReachedEnd(3.0));
    }

    #[test]
    fn test_seek_while_playing_reanchors() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        clock.play(2.0, t0);
        clock.seek(7.0, t0 + ms(1000));
        let p = clock.position(t0 + ms(1001)).unwrap();
        assert!((p - 7.001).abs() < 1e-6, "got {}", p);
    }

    #[test]
    fn test_seek_while_paused_does_not_start() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        clock.seek(3.0, t0);
        assert_eq!(clock.state(), PlaybackState::Stopped);
        assert_eq!(clock.position(t0 + ms(500)), None);
    }

    #[test]
    fn test_pause_captures_position() {
        let t0 = Instant::now();
        let mut model = loaded(10.0);
        let mut clock = PlaybackClock::new();
        clock.play(1.0, t0);
        clock.pause(&mut model, t0 + ms(2250));
        assert_eq!(clock.state(), PlaybackState::Paused);
        assert!((model.playhead() - 3.25).abs() < 1e-9);
        assert_eq!(clock.tick(&mut model, t0 + ms(5000)), ClockTick::Idle);

        clock.play(model.playhead(), t0 + ms(6000));
        let p = clock.position(t0 + ms(6500)).unwrap();
        assert!((p - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_stop_rewinds() {
        let t0 = Instant::now();
        let mut model = loaded(10.0);
        let mut clock = PlaybackClock::new();
        clock.play(4.0, t0);
        clock.tick(&mut model, t0 + ms(1000));
        clock.stop(&mut model);
        assert_eq!(clock.state(), PlaybackState::Stopped);
        assert_eq!(model.playhead(), 0.0);
    }

    #[test]
    fn test_cadence_gates_runs() {
        let t0 = Instant::now();
        let mut cadence = Cadence::new(ms(100));
        assert!(cadence.due(t0));
        assert!(!cadence.due(t0 + ms(40)));
        assert_eq!(cadence.time_until_due(t0 + ms(40)), ms(60));
        assert!(cadence.due(t0 + ms(100)));
        assert!(!cadence.due(t0 + ms(150)));
    }

    #[test]
    fn test_shared_playhead_roundtrip() {
        let shared = SharedPlayhead::new(0.0);
        let reader = shared.clone();
        shared.store(12.345);
        assert_eq!(reader.load(), 12.345);
    }

    #[test]
    fn test_preview_fetches_only_when_due_and_moved() {
        let t0 = Instant::now();
        let shared = SharedPlayhead::new(0.0);
        let mut preview = PreviewTask::new(10, shared.clone());

        assert_eq!(preview.poll(t0), Some(0.0));
        // Playhead unchanged: nothing to fetch even when due.
        assert_eq!(preview.poll(t0 + ms(200)), None);

        // Clock runs faster than the preview rate; requests don't pile up.
        shared.store(1.0);
        assert_eq!(preview.poll(t0 + ms(210)), Some(1.0));
        shared.store(1.05);
        assert_eq!(preview.poll(t0 + ms(250)), None);
        shared.store(1.1);
        assert_eq!(preview.poll(t0 + ms(320)), Some(1.1));

        assert!(!preview.is_stale());
        shared.store(2.0);
        assert!(preview.is_stale());

        preview.invalidate();
        assert_eq!(preview.poll(t0 + ms(500)), Some(2.0));
    }
}
