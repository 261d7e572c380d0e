//! Flick Scrolling Engine
//!
//! Headless momentum scrolling: drag tracking, velocity estimation,
//! easing-driven deceleration with overshoot and snapback, page snapping,
//! nested-view gesture delegation, and wrapping item carousels.
//!
//! The engine owns behavior only. Rendering and input capture stay on the
//! host side of two narrow seams: normalized
//! [`PointerEvent`](flick_core::PointerEvent)s flow in, computed offsets
//! flow out through a [`ScrollSurface`] (or [`CarouselSurface`]). Time and
//! timers are injected, so the whole engine runs deterministically under
//! test.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use flick_animation::ManualScheduler;
//! use flick_core::{PointerEvent, Size};
//! use flick_scroll::{RecordingSurface, ScrollConfig, ScrollView, SharedSurface};
//!
//! let scheduler = ManualScheduler::new();
//! let surface = SharedSurface::new(RecordingSurface::new(
//!     Size::new(320.0, 2000.0), // content
//!     Size::new(320.0, 480.0),  // viewport
//! ));
//!
//! let view = ScrollView::new(
//!     Box::new(surface.clone()),
//!     ScrollConfig::vertical(),
//!     Arc::new(scheduler.clock()),
//!     Arc::new(scheduler.clone()),
//! )
//! .unwrap();
//!
//! // Drag down fast, release, and fast-forward through the momentum
//! view.handle_pointer(PointerEvent::press(160.0, 400.0, 0.0));
//! view.handle_pointer(PointerEvent::moved(160.0, 340.0, 16.0));
//! view.handle_pointer(PointerEvent::release(160.0, 340.0, 16.0));
//! scheduler.advance(4000.0);
//!
//! assert!(!view.is_animating());
//! assert!(view.scroll_position().y < -60.0);
//! ```

pub mod circular;
pub mod config;
pub mod events;
pub mod surface;
pub mod view;

pub use circular::{wrap_index, CarouselSurface, CircularView};
pub use config::{CircularConfig, ScrollConfig, ScrollDirection, ScrollMethod};
pub use events::ScrollCallbacks;
pub use surface::{RecordedOffset, RecordingSurface, ScrollSurface, SharedSurface};
pub use view::{GesturePhase, ScrollView};
