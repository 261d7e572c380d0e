//! Flick Animation System
//!
//! Easing curves, momentum tracking, and tick scheduling for the Flick
//! scrolling engine.
//!
//! # Features
//!
//! - **Easing Table**: The classic named curve families (quad through bounce)
//!   with the `(elapsed, begin, change, duration)` contract
//! - **MomentumTracker**: Per-axis kinetic deceleration with overshoot and
//!   snapback, driven by injected timestamps for deterministic testing
//! - **Clock**: Swappable time source (`SystemClock` for hosts,
//!   `ManualClock` for tests)
//! - **TickScheduler**: One-shot timer abstraction with a deterministic
//!   `ManualScheduler` and a background-thread `ThreadScheduler`

pub mod clock;
pub mod easing;
pub mod scheduler;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::Easing;
pub use scheduler::{ManualScheduler, ThreadScheduler, TickCallback, TickId, TickScheduler};
pub use tracker::{MomentumTracker, TrackerState, TrackerTimings};
