// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction on the timeline.
//!
//! A press either grabs one of the draggable targets (start marker, end
//! marker, playhead) or, when nothing is close enough, seeks the playhead
//! straight to the pressed position. Moves update the grabbed target and
//! a release always returns to idle.
//!
//! When targets overlap the first entry of [`HIT_ORDER`] wins. Markers come
//! before the playhead so a marker sitting on the playhead (both at `0`
//! right after loading, for instance) can still be dragged.

use super::timeline::TimelineModel;
use crate::util::geometry::Layout;

/// Something on the timeline that can be grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Start,
    End,
    Playhead,
}

/// Hit-test priority, highest first.
pub const HIT_ORDER: [DragTarget; 3] = [DragTarget::Start, DragTarget::End, DragTarget::Playhead];

impl DragTarget {
    /// Current time of this target.
    pub fn time(self, model: &TimelineModel) -> f64 {
        match self {
            DragTarget::Start => model.start(),
            DragTarget::End => model.end(),
            DragTarget::Playhead => model.playhead(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        target: DragTarget,
        /// Pointer x minus target x at press time, so the target keeps its
        /// position relative to the pointer instead of jumping under it.
        offset: f64,
    },
}

/// Notifications for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEvent {
    RangeChanged { start: f64, end: f64 },
    SeekRequested(f64),
}

#[derive(Debug, Clone)]
pub struct Interaction {
    state: DragState,
    hit_radius: f64,
}

impl Interaction {
    pub fn new(hit_radius: f64) -> Self {
        Self {
            state: DragState::Idle,
            hit_radius,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// First target in [`HIT_ORDER`] within the hit radius of `x`, with its
    /// pixel position.
    pub fn hit_test(&self, model: &TimelineModel, layout: &Layout, x: f64) -> Option<(DragTarget, f64)> {
        HIT_ORDER.iter().find_map(|&target| {
            let target_x = layout.time_to_x(target.time(model));
            ((x - target_x).abs() <= self.hit_radius).then_some((target, target_x))
        })
    }

    /// Pointer pressed at `x`.
    pub fn press(&mut self, model: &mut TimelineModel, layout: &Layout, x: f64) -> Option<TimelineEvent> {
        if let Some((target, target_x)) = self.hit_test(model, layout, x) {
            log::debug!("Grabbed {:?} at x={:.1}", target, x);
            self.state = DragState::Dragging {
                target,
                offset: x - target_x,
            };
            return None;
        }

        let t = model.set_playhead(layout.x_to_time(x));
        Some(TimelineEvent::SeekRequested(t))
    }

    /// Pointer moved to `x`. Ignored unless something is being dragged.
    pub fn drag_to(&mut self, model: &mut TimelineModel, layout: &Layout, x: f64) -> Option<TimelineEvent> {
        let DragState::Dragging { target, offset } = self.state else {
            return None;
        };

        let t = layout.x_to_time(x - offset).clamp(0.0, model.duration());
        match target {
            DragTarget::Start => {
                model.set_start(t.min(model.end()));
                Some(TimelineEvent::RangeChanged {
                    start: model.start(),
                    end: model.end(),
                })
            }
            DragTarget::End => {
                model.set_end(t.max(model.start()));
                Some(TimelineEvent::RangeChanged {
                    start: model.start(),
                    end: model.end(),
                })
            }
            DragTarget::Playhead => Some(TimelineEvent::SeekRequested(model.set_playhead(t))),
        }
    }

    /// Pointer released. Always ends any drag, moved or not.
    pub fn release(&mut self) {
        self.state = DragState::Idle;
    }
}
