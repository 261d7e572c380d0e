//! Headless circular carousel example
//!
//! Drives a six-item wrapping carousel through a fling and a programmatic
//! centering jump, printing each slot rebinding as the recycled window
//! slides.
//!
//! Run with: cargo run -p flick_scroll --example carousel

use std::sync::Arc;

use flick_animation::ManualScheduler;
use flick_core::{PointerEvent, Size};
use flick_scroll::{CarouselSurface, CircularConfig, CircularView};

struct PrintingCarousel {
    item_width: f32,
}

impl CarouselSurface for PrintingCarousel {
    fn viewport_size(&self) -> Size {
        Size::new(320.0, 120.0)
    }

    fn item_width(&self) -> f32 {
        self.item_width
    }

    fn set_offset(&mut self, _x: f32, _transition_ms: Option<f32>) {}

    fn bind_item(&mut self, slot: usize, item: usize) {
        println!("slot {slot} now shows item {item}");
    }
}

fn main() {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let scheduler = ManualScheduler::new();
    let clock = scheduler.clock();

    let carousel = CircularView::new(
        Box::new(PrintingCarousel { item_width: 100.0 }),
        6,
        CircularConfig::default(),
        Arc::new(clock.clone()),
        Arc::new(scheduler.clone()),
    )
    .expect("valid config");

    println!("window: {:?}", carousel.window_items());

    // Fling left through a couple of revolutions
    let frame = 1000.0 / 60.0;
    let mut t = 0.0;
    carousel.handle_pointer(PointerEvent::press(300.0, 60.0, t));
    for step in 1..=4 {
        t += frame;
        clock.set(t);
        carousel.handle_pointer(PointerEvent::moved(300.0 - 35.0 * step as f32, 60.0, t));
    }
    carousel.handle_pointer(PointerEvent::release(160.0, 60.0, t));
    scheduler.advance(4000.0);

    println!("after fling: {:?}", carousel.window_items());

    carousel.center_to(2).expect("item exists");
    println!("centered on 2: {:?}", carousel.window_items());
}
