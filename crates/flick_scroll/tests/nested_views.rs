//! End-to-end tests for nested scroll views through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flick_animation::{Clock, ManualScheduler};
use flick_core::{Point, PointerEvent, Size};
use flick_scroll::{RecordingSurface, ScrollConfig, ScrollView, SharedSurface};

const FRAME: f32 = 1000.0 / 60.0;

struct Nest {
    outer: ScrollView,
    inner: ScrollView,
    outer_surface: SharedSurface<RecordingSurface>,
    inner_surface: SharedSurface<RecordingSurface>,
    scheduler: ManualScheduler,
}

/// A horizontal pager with a vertical list inside, the classic nesting
fn nest() -> Nest {
    let scheduler = ManualScheduler::new();

    let outer_surface = SharedSurface::new(RecordingSurface::new(
        Size::new(1600.0, 480.0),
        Size::new(320.0, 480.0),
    ));
    let outer = ScrollView::new(
        Box::new(outer_surface.clone()),
        ScrollConfig::horizontal(),
        Arc::new(scheduler.clock()),
        Arc::new(scheduler.clone()),
    )
    .unwrap();

    let inner_surface = SharedSurface::new(RecordingSurface::new(
        Size::new(320.0, 3000.0),
        Size::new(320.0, 480.0),
    ));
    let inner = ScrollView::new(
        Box::new(inner_surface.clone()),
        ScrollConfig::vertical(),
        Arc::new(scheduler.clock()),
        Arc::new(scheduler.clone()),
    )
    .unwrap();
    inner.set_parent(&outer);

    Nest {
        outer,
        inner,
        outer_surface,
        inner_surface,
        scheduler,
    }
}

fn swipe(view: &ScrollView, scheduler: &ManualScheduler, dx: f32, dy: f32) {
    let clock = scheduler.clock();
    let mut t = clock.now_ms();
    view.handle_pointer(PointerEvent::press(160.0, 240.0, t));
    for step in 1..=4 {
        t += FRAME;
        clock.set(t);
        let p = step as f32 / 4.0;
        view.handle_pointer(PointerEvent::moved(160.0 + dx * p, 240.0 + dy * p, t));
    }
    view.handle_pointer(PointerEvent::release(160.0 + dx, 240.0 + dy, t));
}

#[test]
fn horizontal_swipe_on_inner_list_scrolls_the_pager() {
    let n = nest();

    swipe(&n.inner, &n.scheduler, -120.0, 2.0);
    n.scheduler.advance(4000.0);

    // The pager moved, the list did not move at all
    assert!(n.outer.scroll_position().x < -120.0);
    assert_eq!(n.inner.scroll_position(), Point::ZERO);
    assert!(n.inner_surface.lock().writes().is_empty());
    assert!(!n.outer.is_animating());
}

#[test]
fn vertical_swipe_stays_on_the_inner_list() {
    let n = nest();

    swipe(&n.inner, &n.scheduler, 2.0, -120.0);
    n.scheduler.advance(4000.0);

    assert!(n.inner.scroll_position().y < -120.0);
    assert_eq!(n.outer.scroll_position(), Point::ZERO);
    assert!(n.outer_surface.lock().writes().is_empty());
}

#[test]
fn new_gesture_on_inner_stops_ancestor_momentum() {
    let n = nest();

    // Fling the pager through the inner view (delegated)
    swipe(&n.inner, &n.scheduler, -120.0, 0.0);
    assert!(n.outer.is_animating());

    // A fresh press on the inner view must stop the ancestor synchronously
    let t = n.scheduler.clock().now_ms();
    n.inner.handle_pointer(PointerEvent::press(160.0, 240.0, t));
    assert!(!n.outer.is_animating());

    // No stale tick may move the pager afterwards
    let frozen = n.outer.scroll_position();
    n.scheduler.advance(4000.0);
    assert_eq!(n.outer.scroll_position(), frozen);
}

#[test]
fn notifications_come_from_the_delegated_ancestor() {
    let n = nest();
    let outer_starts = Arc::new(AtomicUsize::new(0));
    let inner_starts = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&outer_starts);
    n.outer.on_scroll_start(move || {
        c.fetch_add(1, Ordering::Relaxed);
    });
    let c = Arc::clone(&inner_starts);
    n.inner.on_scroll_start(move || {
        c.fetch_add(1, Ordering::Relaxed);
    });

    swipe(&n.inner, &n.scheduler, -120.0, 0.0);
    n.scheduler.advance(4000.0);

    assert_eq!(outer_starts.load(Ordering::Relaxed), 1);
    assert_eq!(inner_starts.load(Ordering::Relaxed), 0);
}

#[test]
fn dropping_a_view_mid_animation_leaves_no_live_timers() {
    let n = nest();

    swipe(&n.inner, &n.scheduler, 0.0, -120.0);
    assert!(n.inner.is_animating());

    drop(n.inner);
    // Pending tick fires into a dead view; nothing panics, queue drains
    n.scheduler.advance(4000.0);
    assert_eq!(n.scheduler.pending_count(), 0);
}
