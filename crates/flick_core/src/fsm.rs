//! Event-driven state transitions
//!
//! Interaction states (gesture phases, widget states) are plain enums whose
//! transitions are declared in one match over `(state, event)`. A transition
//! table returns `Some(new_state)` for a handled event and `None` for events
//! that do not apply in the current state, which callers treat as "stay put".

use crate::events::EventType;

/// Maps events to state transitions
///
/// Implement on a `Copy` state enum and declare the legal transitions:
///
/// ```rust
/// use flick_core::events::event_types::*;
/// use flick_core::fsm::StateTransitions;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// enum Gesture {
///     Idle,
///     Dragging,
///     Momentum,
/// }
///
/// impl StateTransitions for Gesture {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Gesture::Idle, POINTER_DOWN) => Some(Gesture::Dragging),
///             (Gesture::Dragging, FLING) => Some(Gesture::Momentum),
///             (Gesture::Dragging, SETTLED) => Some(Gesture::Idle),
///             (Gesture::Momentum, POINTER_DOWN) => Some(Gesture::Dragging),
///             (Gesture::Momentum, SETTLED) => Some(Gesture::Idle),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait StateTransitions: Sized + Copy {
    /// Return the next state for `event`, or `None` if the event does not
    /// transition out of the current state.
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Apply `event` in place, returning whether a transition happened.
    fn apply(&mut self, event: EventType) -> bool {
        match self.on_event(event) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types::*;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Toggle {
        Off,
        On,
    }

    impl StateTransitions for Toggle {
        fn on_event(&self, event: EventType) -> Option<Self> {
            match (self, event) {
                (Toggle::Off, POINTER_DOWN) => Some(Toggle::On),
                (Toggle::On, POINTER_UP) => Some(Toggle::Off),
                _ => None,
            }
        }
    }

    #[test]
    fn test_apply_transitions() {
        let mut state = Toggle::Off;
        assert!(state.apply(POINTER_DOWN));
        assert_eq!(state, Toggle::On);

        // Unhandled event leaves the state alone
        assert!(!state.apply(POINTER_DOWN));
        assert_eq!(state, Toggle::On);

        assert!(state.apply(POINTER_UP));
        assert_eq!(state, Toggle::Off);
    }
}
