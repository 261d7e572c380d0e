//! Momentum tracking
//!
//! [`MomentumTracker`] is a per-axis kinematic state machine: given a release
//! position and velocity it produces a time-sampled position that decelerates
//! along an easing curve, optionally travels past a bound (`Overshot`) and
//! springs back (`Snapback`), and always comes to rest (`Done`).
//!
//! The tracker never reads a clock. Every operation takes the current time
//! in milliseconds, so a host feeds wall-clock timestamps while tests feed a
//! scripted sequence and get bit-identical trajectories.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::easing::Easing;

/// Motion segment state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    /// Decelerating inside the valid range
    Scrolling,
    /// Travelling past a bound after a hard fling
    Overshot,
    /// Easing back to the violated bound
    Snapback,
    /// At rest
    Done,
}

/// Timing configuration for the overshoot and snapback segments
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerTimings {
    /// Duration of the past-the-bound excursion
    pub overshoot_ms: f32,
    /// Duration of the spring-back to the bound
    pub snapback_ms: f32,
    /// Deceleration curve
    pub easing: Easing,
}

impl Default for TrackerTimings {
    fn default() -> Self {
        Self {
            overshoot_ms: 250.0,
            snapback_ms: 500.0,
            easing: Easing::OutQuad,
        }
    }
}

/// Per-axis momentum state machine
///
/// Owned exclusively by one scroll axis. `position()` is the single source
/// of truth for the rendered offset while a motion segment is live.
#[derive(Clone, Copy, Debug)]
pub struct MomentumTracker {
    state: TrackerState,
    pos: f32,
    speed: f32,
    duration_ms: f32,
    start_ms: f32,
    min_pos: f32,
    max_pos: f32,
    from_pos: f32,
    to_pos: f32,
    last_update_ms: f32,
    timings: TrackerTimings,
}

impl MomentumTracker {
    pub fn new(timings: TrackerTimings) -> Self {
        Self {
            state: TrackerState::Done,
            pos: 0.0,
            speed: 0.0,
            duration_ms: 0.0,
            start_ms: 0.0,
            min_pos: 0.0,
            max_pos: 0.0,
            from_pos: 0.0,
            to_pos: 0.0,
            last_update_ms: f32::NEG_INFINITY,
            timings,
        }
    }

    /// Begin a motion segment at `now_ms`.
    ///
    /// A release inside `[min_pos, max_pos]` with nonzero `speed` starts a
    /// `Scrolling` segment over `duration_ms`. A release outside the range
    /// starts a `Snapback` to the violated bound over the configured
    /// snapback duration regardless of speed, so a slow overshoot drag can
    /// never leave the position stranded past an edge. Zero speed inside the
    /// range is already at rest.
    pub fn start(
        &mut self,
        pos: f32,
        speed: f32,
        duration_ms: f32,
        min_pos: f32,
        max_pos: f32,
        now_ms: f32,
    ) {
        self.pos = pos;
        self.speed = speed;
        self.min_pos = min_pos;
        self.max_pos = max_pos;
        self.start_ms = now_ms;
        self.last_update_ms = f32::NEG_INFINITY;

        self.state = if pos < min_pos || pos > max_pos {
            self.from_pos = pos;
            self.to_pos = if pos < min_pos { min_pos } else { max_pos };
            self.duration_ms = self.timings.snapback_ms;
            TrackerState::Snapback
        } else if speed != 0.0 && duration_ms > 0.0 {
            self.duration_ms = duration_ms;
            TrackerState::Scrolling
        } else {
            self.duration_ms = 0.0;
            TrackerState::Done
        };
        trace!(
            state = ?self.state,
            pos,
            speed,
            duration_ms = self.duration_ms,
            "momentum segment started"
        );
    }

    /// Advance the motion to `now_ms` and return the new position.
    ///
    /// Repeated calls at the same timestamp are no-ops returning the same
    /// position. Never produces NaN: non-positive durations complete the
    /// current segment immediately.
    pub fn update(&mut self, overshoot_enabled: bool, now_ms: f32) -> f32 {
        if self.state == TrackerState::Done {
            return self.pos;
        }
        if now_ms == self.last_update_ms {
            return self.pos;
        }
        self.last_update_ms = now_ms;

        let duration = self.duration_ms;
        if duration <= 0.0 {
            if self.state == TrackerState::Snapback {
                self.pos = self.to_pos;
            }
            self.state = TrackerState::Done;
            return self.pos;
        }
        let elapsed = (now_ms - self.start_ms).clamp(0.0, duration);

        match self.state {
            TrackerState::Scrolling | TrackerState::Overshot => {
                let progress = self.timings.easing.ease(elapsed, 0.0, 1.0, duration);
                let dx = self.speed * (1.0 - progress);
                let mut x = self.pos + dx;

                let overshot = self.state == TrackerState::Scrolling
                    && (x < self.min_pos || x > self.max_pos);
                if overshot {
                    x = x.clamp(self.min_pos, self.max_pos);
                }
                self.pos = x;

                if self.state == TrackerState::Overshot {
                    if elapsed >= duration {
                        // Excursion spent; spring back to the violated bound
                        self.from_pos = self.pos;
                        self.to_pos = self.pos.clamp(self.min_pos, self.max_pos);
                        self.duration_ms = self.timings.snapback_ms;
                        self.start_ms = now_ms;
                        self.state = TrackerState::Snapback;
                        trace!(from = self.from_pos, to = self.to_pos, "snapback started");
                    }
                } else if overshot && overshoot_enabled {
                    // Carry half the residual step past the bound
                    self.speed = dx / 2.0;
                    self.duration_ms = self.timings.overshoot_ms;
                    self.start_ms = now_ms;
                    self.state = TrackerState::Overshot;
                    trace!(speed = self.speed, "overshoot started");
                } else if elapsed >= duration {
                    self.state = TrackerState::Done;
                }
            }
            TrackerState::Snapback => {
                if elapsed >= duration {
                    self.pos = self.to_pos;
                    self.state = TrackerState::Done;
                } else {
                    self.pos = self
                        .timings
                        .easing
                        .ease(elapsed, self.from_pos, self.to_pos - self.from_pos, duration);
                }
            }
            TrackerState::Done => {}
        }

        self.pos
    }

    /// Whether the motion has come to rest
    pub fn done(&self) -> bool {
        self.state == TrackerState::Done
    }

    /// Current position along the axis
    pub fn position(&self) -> f32 {
        self.pos
    }

    /// Current segment state
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Force the tracker to rest and zero its fields.
    ///
    /// Used when a new gesture interrupts an in-flight animation.
    pub fn reset(&mut self) {
        self.state = TrackerState::Done;
        self.pos = 0.0;
        self.speed = 0.0;
        self.duration_ms = 0.0;
        self.start_ms = 0.0;
        self.min_pos = 0.0;
        self.max_pos = 0.0;
        self.from_pos = 0.0;
        self.to_pos = 0.0;
        self.last_update_ms = f32::NEG_INFINITY;
    }
}

impl Default for MomentumTracker {
    fn default() -> Self {
        Self::new(TrackerTimings::default())
    }
}
