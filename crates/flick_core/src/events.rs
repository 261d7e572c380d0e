//! Normalized input event types
//!
//! Host platforms deliver pointer input in many shapes (mouse events, touch
//! events, synthesized pointer events). The scrolling engine consumes exactly
//! one shape: [`PointerEvent`], constructed once at the platform boundary.
//! Everything downstream of that boundary is platform-agnostic.

use serde::{Deserialize, Serialize};

/// Numeric event type used by [`StateTransitions`](crate::fsm::StateTransitions)
/// implementations.
pub type EventType = u32;

/// Event type constants for interaction state machines.
pub mod event_types {
    use super::EventType;

    /// Pointer pressed (mouse button down / touch start)
    pub const POINTER_DOWN: EventType = 1;
    /// Pointer moved while tracking
    pub const POINTER_MOVE: EventType = 2;
    /// Pointer released (mouse button up / touch end)
    pub const POINTER_UP: EventType = 3;
    /// A release handed off to momentum animation
    pub const FLING: EventType = 4;
    /// All motion has come to rest
    pub const SETTLED: EventType = 5;
}

// ============================================================================
// Pointer Events
// ============================================================================

/// Phase of a pointer gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    /// Pointer made contact
    Press,
    /// Pointer moved while in contact
    Move,
    /// Pointer contact ended
    Release,
}

impl PointerPhase {
    /// The event-type constant this phase maps to
    pub fn event_type(self) -> EventType {
        match self {
            PointerPhase::Press => event_types::POINTER_DOWN,
            PointerPhase::Move => event_types::POINTER_MOVE,
            PointerPhase::Release => event_types::POINTER_UP,
        }
    }
}

/// A normalized pointer event in host coordinates
///
/// `timestamp_ms` is milliseconds on the host's monotonic clock. Velocity
/// estimation compares timestamps between events, so they must share one
/// clock; their absolute origin is irrelevant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Gesture phase
    pub phase: PointerPhase,
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Timestamp in milliseconds on the host clock
    pub timestamp_ms: f32,
}

impl PointerEvent {
    /// A press event
    pub fn press(x: f32, y: f32, timestamp_ms: f32) -> Self {
        Self {
            phase: PointerPhase::Press,
            x,
            y,
            timestamp_ms,
        }
    }

    /// A move event
    pub fn moved(x: f32, y: f32, timestamp_ms: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
            timestamp_ms,
        }
    }

    /// A release event
    pub fn release(x: f32, y: f32, timestamp_ms: f32) -> Self {
        Self {
            phase: PointerPhase::Release,
            x,
            y,
            timestamp_ms,
        }
    }

    /// Position as a [`Point`](crate::geometry::Point)
    pub fn position(&self) -> crate::geometry::Point {
        crate::geometry::Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_event_types_are_distinct() {
        let press = PointerPhase::Press.event_type();
        let moved = PointerPhase::Move.event_type();
        let release = PointerPhase::Release.event_type();
        assert_ne!(press, moved);
        assert_ne!(moved, release);
        assert_ne!(press, release);
    }

    #[test]
    fn test_constructors_set_phase() {
        assert_eq!(PointerEvent::press(0.0, 0.0, 0.0).phase, PointerPhase::Press);
        assert_eq!(PointerEvent::moved(0.0, 0.0, 0.0).phase, PointerPhase::Move);
        assert_eq!(
            PointerEvent::release(0.0, 0.0, 0.0).phase,
            PointerPhase::Release
        );
    }
}
