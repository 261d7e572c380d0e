//! Headless momentum scroll example
//!
//! Simulates a fast vertical drag on a long list and prints the rendered
//! trajectory while the momentum animation decelerates, overshoots the
//! bottom edge and snaps back.
//!
//! Run with: cargo run -p flick_scroll --example momentum

use std::sync::Arc;

use flick_animation::{Clock, ManualScheduler};
use flick_core::{PointerEvent, Size};
use flick_scroll::{RecordingSurface, ScrollConfig, ScrollView, SharedSurface};

fn main() {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scheduler = ManualScheduler::new();
    let clock = scheduler.clock();
    let surface = SharedSurface::new(RecordingSurface::new(
        Size::new(320.0, 2000.0), // a long list
        Size::new(320.0, 480.0),  // phone-ish viewport
    ));

    let view = ScrollView::new(
        Box::new(surface.clone()),
        ScrollConfig::elastic(),
        Arc::new(clock.clone()),
        Arc::new(scheduler.clone()),
    )
    .expect("valid config");

    view.on_scroll_stop(|| println!("-- scroll stopped --"));

    // A quick upward swipe: four fast moves, release while still moving
    let frame = 1000.0 / 60.0;
    let mut t = 0.0;
    view.handle_pointer(PointerEvent::press(160.0, 420.0, t));
    for step in 1..=4 {
        t += frame;
        clock.set(t);
        view.handle_pointer(PointerEvent::moved(160.0, 420.0 - 90.0 * step as f32, t));
    }
    view.handle_pointer(PointerEvent::release(160.0, 60.0, t));

    // Fast-forward through the whole animation, sampling every 100ms
    while view.is_animating() {
        scheduler.advance(100.0);
        let pos = view.scroll_position();
        println!("t={:6.0}ms  y={:8.2}", clock.now_ms(), pos.y);
    }

    let writes = surface.lock().writes().len();
    println!("final y = {:.2} after {writes} surface writes", view.scroll_position().y);
}
