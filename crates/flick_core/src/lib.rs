//! Flick Core
//!
//! This crate provides the foundational primitives for the Flick scrolling
//! engine:
//!
//! - **Normalized Input**: One pointer event shape for mouse and touch
//! - **State Machines**: Event-driven transition tables for interaction states
//! - **Geometry**: Small value types shared by every crate
//! - **Errors**: The common error type for fallible public operations
//!
//! # Example
//!
//! ```rust
//! use flick_core::events::{event_types, PointerEvent};
//! use flick_core::fsm::StateTransitions;
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Debug)]
//! enum Phase {
//!     Idle,
//!     Dragging,
//! }
//!
//! impl StateTransitions for Phase {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Phase::Idle, event_types::POINTER_DOWN) => Some(Phase::Dragging),
//!             (Phase::Dragging, event_types::POINTER_UP) => Some(Phase::Idle),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let press = PointerEvent::press(10.0, 20.0, 0.0);
//! assert_eq!(Phase::Idle.on_event(press.phase.event_type()), Some(Phase::Dragging));
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;

pub use error::{Error, Result};
pub use events::{EventType, PointerEvent, PointerPhase};
pub use fsm::StateTransitions;
pub use geometry::{Axis, Point, Size};
