//! Circular item carousel
//!
//! [`CircularView`] is the single-axis sibling of
//! [`ScrollView`](crate::view::ScrollView) for finite item sequences that
//! wrap around: index arithmetic is modular, so there are no edges, no
//! clamping and no snapback. Instead of free-form content the view manages a
//! bounded physical window of `items_per_view + 2` recycled slots; sliding
//! the view rebinds one slot per item crossed, so host-side cost stays
//! constant no matter how many logical items exist.
//!
//! Drag and fling follow the same contract as `ScrollView`, restricted to
//! the x axis, with the same move-threshold and release-velocity rules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, trace};

use flick_animation::{Clock, MomentumTracker, TickId, TickScheduler};
use flick_core::events::{event_types, PointerEvent, PointerPhase};
use flick_core::{Error, Point, Result, Size, StateTransitions};

use crate::config::CircularConfig;
use crate::events::ScrollCallbacks;
use crate::surface::SharedSurface;
use crate::view::GesturePhase;

/// Wrap `index` into `[0, len)` with modular arithmetic.
///
/// `wrap_index(-1, 6) == 5`, `wrap_index(6, 6) == 0`. An empty range maps
/// everything to `0`.
pub fn wrap_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (((index % len) + len) % len) as usize
}

/// The visual row a circular view drives
///
/// Slots are stable handles to the recycled visual items; `bind_item` tells
/// the host that a slot now displays a different logical item.
pub trait CarouselSurface: Send {
    /// Size of the clip viewport
    fn viewport_size(&self) -> Size;

    /// Width of one item; items are uniform
    fn item_width(&self) -> f32;

    /// Horizontal offset of the slot row's first slot.
    ///
    /// `transition_ms` asks the surface to animate the write itself;
    /// tick-driven animation passes `None`.
    fn set_offset(&mut self, x: f32, transition_ms: Option<f32>);

    /// Slot `slot` now displays logical item `item`
    fn bind_item(&mut self, slot: usize, item: usize);
}

impl<S: CarouselSurface> CarouselSurface for SharedSurface<S> {
    fn viewport_size(&self) -> Size {
        self.lock().viewport_size()
    }

    fn item_width(&self) -> f32 {
        self.lock().item_width()
    }

    fn set_offset(&mut self, x: f32, transition_ms: Option<f32>) {
        self.lock().set_offset(x, transition_ms);
    }

    fn bind_item(&mut self, slot: usize, item: usize) {
        self.lock().bind_item(slot, item);
    }
}

/// One physical slot in the recycled window
#[derive(Clone, Copy, Debug)]
struct Slot {
    id: usize,
    item: usize,
}

#[derive(Default)]
struct CircDrag {
    start_x: f32,
    last_x: f32,
    last_move_ms: Option<f32>,
    speed: f32,
    did_drag: bool,
}

struct CircInner {
    config: CircularConfig,
    surface: Box<dyn CarouselSurface>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn TickScheduler>,
    callbacks: ScrollCallbacks,

    item_count: usize,
    item_width: f32,
    viewport_width: f32,
    items_per_view: usize,
    /// Recycled slots, leftmost first; `first` is the logical index of the
    /// leftmost slot (one item before the view edge)
    window: VecDeque<Slot>,
    first: i64,
    /// Continuous scroll offset; item `j` sits at `sx + j * item_width`
    sx: f32,

    phase: GesturePhase,
    motion_live: bool,
    tracker: MomentumTracker,
    timer: Option<TickId>,
    drag: CircDrag,
}

type InnerHandle = Arc<Mutex<CircInner>>;

/// A wrapping single-axis item carousel
#[derive(Clone)]
pub struct CircularView {
    inner: InnerHandle,
}

impl CircularView {
    /// Create a carousel over `item_count` logical items.
    pub fn new(
        surface: Box<dyn CarouselSurface>,
        item_count: usize,
        config: CircularConfig,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Result<Self> {
        config.validate()?;
        let timings = flick_animation::TrackerTimings {
            easing: config.easing,
            ..Default::default()
        };
        let view = Self {
            inner: Arc::new(Mutex::new(CircInner {
                config,
                surface,
                clock,
                scheduler,
                callbacks: ScrollCallbacks::new(),
                item_count,
                item_width: 0.0,
                viewport_width: 0.0,
                items_per_view: 0,
                window: VecDeque::new(),
                first: 0,
                sx: 0.0,
                phase: GesturePhase::Idle,
                motion_live: false,
                tracker: MomentumTracker::new(timings),
                timer: None,
                drag: CircDrag::default(),
            })),
        };
        view.refresh();
        Ok(view)
    }

    /// Feed one normalized pointer event; see
    /// [`ScrollView::handle_pointer`](crate::view::ScrollView::handle_pointer)
    /// for the consumed/tap contract.
    pub fn handle_pointer(&self, event: PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Press => CircInner::drag_start(&self.inner, &event),
            PointerPhase::Move => CircInner::drag_move(&self.inner, &event),
            PointerPhase::Release => CircInner::drag_stop(&self.inner, &event),
        }
    }

    /// Current continuous offset (x only)
    pub fn scroll_position(&self) -> Point {
        Point::new(self.inner.lock().unwrap().sx, 0.0)
    }

    /// Whether a fling is animating
    pub fn is_animating(&self) -> bool {
        self.inner.lock().unwrap().phase == GesturePhase::Momentum
    }

    /// Logical items currently bound to the physical window, leftmost first
    pub fn window_items(&self) -> Vec<usize> {
        self.inner
            .lock()
            .unwrap()
            .window
            .iter()
            .map(|slot| slot.item)
            .collect()
    }

    /// Number of items that fit the viewport
    pub fn items_per_view(&self) -> usize {
        self.inner.lock().unwrap().items_per_view
    }

    /// Center `item` in the viewport.
    ///
    /// Picks the wrapped representation nearest to the current offset and
    /// lets the surface animate the jump over the configured centering
    /// duration.
    pub fn center_to(&self, item: usize) -> Result<()> {
        let mut g = self.inner.lock().unwrap();
        if item >= g.item_count {
            return Err(Error::ItemOutOfRange {
                index: item,
                len: g.item_count,
            });
        }
        if g.item_width <= 0.0 || g.window.is_empty() {
            return Ok(());
        }
        g.halt_and_settle();

        let center = (g.viewport_width - g.item_width) / 2.0;
        let target0 = center - item as f32 * g.item_width;
        let period = g.item_count as f32 * g.item_width;
        let k = ((g.sx - target0) / period).round();
        g.sx = target0 + k * period;

        let transition = g.config.center_duration_ms;
        g.apply_position(Some(transition));
        debug!(item, sx = g.sx, "centered item");
        Ok(())
    }

    /// Re-read viewport and item measurements, recomputing the window.
    ///
    /// Call after a resize or orientation change.
    pub fn refresh(&self) {
        let mut g = self.inner.lock().unwrap();
        g.halt_and_settle();
        g.viewport_width = g.surface.viewport_size().width;
        g.item_width = g.surface.item_width();
        g.items_per_view = if g.item_width > 0.0 {
            (g.viewport_width / g.item_width).ceil() as usize
        } else {
            0
        };
        g.rebuild_window();
    }

    /// Register a scroll-start handler
    pub fn on_scroll_start(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.inner
            .lock()
            .unwrap()
            .callbacks
            .push_start(Box::new(handler));
    }

    /// Register a scroll-update handler
    pub fn on_scroll_update(&self, handler: impl Fn(Point) + Send + Sync + 'static) {
        self.inner
            .lock()
            .unwrap()
            .callbacks
            .push_update(Box::new(handler));
    }

    /// Register a scroll-stop handler
    pub fn on_scroll_stop(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.inner
            .lock()
            .unwrap()
            .callbacks
            .push_stop(Box::new(handler));
    }
}

impl CircInner {
    fn drag_start(this: &InnerHandle, event: &PointerEvent) -> bool {
        let mut g = this.lock().unwrap();
        if g.window.is_empty() {
            // Nothing to scroll
            return false;
        }
        let interrupted = g.phase != GesturePhase::Idle;
        g.halt_and_settle();
        g.phase.apply(event_types::POINTER_DOWN);
        g.drag = CircDrag {
            start_x: event.x,
            last_x: event.x,
            ..Default::default()
        };
        interrupted
    }

    fn drag_move(this: &InnerHandle, event: &PointerEvent) -> bool {
        let mut g = this.lock().unwrap();
        if g.phase != GesturePhase::Dragging {
            return false;
        }
        if !g.drag.did_drag && (event.x - g.drag.start_x).abs() < g.config.move_threshold {
            return false;
        }
        g.drag.did_drag = true;

        let delta = event.x - g.drag.last_x;
        g.sx += delta;
        g.drag.speed = delta;
        g.drag.last_x = event.x;
        g.drag.last_move_ms = Some(event.timestamp_ms);

        g.emit_motion_start();
        g.apply_position(None);
        true
    }

    fn drag_stop(this: &InnerHandle, event: &PointerEvent) -> bool {
        let mut g = this.lock().unwrap();
        if g.phase != GesturePhase::Dragging {
            return false;
        }
        if !g.drag.did_drag {
            g.phase.apply(event_types::SETTLED);
            return false;
        }

        let fling = g
            .drag
            .last_move_ms
            .map(|last| event.timestamp_ms - last <= g.config.move_interval_threshold_ms)
            .unwrap_or(false);
        let speed = if fling { g.drag.speed } else { 0.0 };

        if speed != 0.0 {
            let now = g.clock.now_ms();
            let (sx, duration) = (g.sx, g.config.scroll_duration_ms);
            // No edges on a circle: the tracker runs unbounded
            g.tracker
                .start(sx, speed, duration, f32::NEG_INFINITY, f32::INFINITY, now);
        }
        if !g.tracker.done() {
            debug!(speed, "carousel fling started");
            g.phase.apply(event_types::FLING);
            drop(g);
            Self::schedule_tick(this);
        } else {
            g.settle();
        }
        true
    }

    fn on_tick(&mut self) -> bool {
        if self.phase != GesturePhase::Momentum {
            self.timer = None;
            return false;
        }
        let now = self.clock.now_ms();
        self.sx = self.tracker.update(false, now);
        self.apply_position(None);

        if self.tracker.done() {
            self.timer = None;
            self.settle();
            false
        } else {
            true
        }
    }

    fn schedule_tick(this: &InnerHandle) {
        let mut g = this.lock().unwrap();
        let interval = g.config.tick_interval_ms();
        let scheduler = Arc::clone(&g.scheduler);
        if let Some(old) = g.timer.take() {
            scheduler.cancel(old);
        }
        let weak: Weak<Mutex<CircInner>> = Arc::downgrade(this);
        let id = scheduler.schedule(
            interval,
            Box::new(move || {
                if let Some(arc) = weak.upgrade() {
                    let rearm = arc.lock().unwrap().on_tick();
                    if rearm {
                        Self::schedule_tick(&arc);
                    }
                }
            }),
        );
        g.timer = Some(id);
    }

    fn halt_and_settle(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
        if !self.tracker.done() {
            self.sx = self.tracker.position();
        }
        self.tracker.reset();
        if self.phase != GesturePhase::Idle {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.phase.apply(event_types::SETTLED);
        if self.motion_live {
            self.motion_live = false;
            self.callbacks.emit_stop();
        }
        trace!(sx = self.sx, "carousel settled");
    }

    fn emit_motion_start(&mut self) {
        if !self.motion_live {
            self.motion_live = true;
            self.callbacks.emit_start();
        }
    }

    // ========================================================================
    // Window recycling
    // ========================================================================

    /// Apply the current offset: slide the recycled window to cover the
    /// viewport, then position the slot row.
    fn apply_position(&mut self, transition_ms: Option<f32>) {
        if self.item_width > 0.0 && !self.window.is_empty() {
            let wanted_first = (-self.sx / self.item_width).floor() as i64 - 1;
            self.slide_window(wanted_first);
            let row_x = self.sx + self.first as f32 * self.item_width;
            self.surface.set_offset(row_x, transition_ms);
        }
        self.callbacks.emit_update(Point::new(self.sx, 0.0));
    }

    /// Shift the window one slot at a time until its leftmost logical index
    /// is `wanted_first`, recycling exactly one slot per step.
    fn slide_window(&mut self, wanted_first: i64) {
        let len = self.window.len() as i64;
        while self.first < wanted_first {
            if let Some(mut slot) = self.window.pop_front() {
                self.first += 1;
                slot.item = wrap_index(self.first + len - 1, self.item_count);
                self.surface.bind_item(slot.id, slot.item);
                self.window.push_back(slot);
            }
        }
        while self.first > wanted_first {
            if let Some(mut slot) = self.window.pop_back() {
                self.first -= 1;
                slot.item = wrap_index(self.first, self.item_count);
                self.surface.bind_item(slot.id, slot.item);
                self.window.push_front(slot);
            }
        }
    }

    /// Build the window from scratch and bind every slot
    fn rebuild_window(&mut self) {
        self.window.clear();
        if self.item_count == 0 || self.items_per_view == 0 {
            debug!("carousel has no measurable items");
            return;
        }
        let slots = self.items_per_view + 2;
        self.first = (-self.sx / self.item_width).floor() as i64 - 1;
        for id in 0..slots {
            let item = wrap_index(self.first + id as i64, self.item_count);
            self.surface.bind_item(id, item);
            self.window.push_back(Slot { id, item });
        }
        let row_x = self.sx + self.first as f32 * self.item_width;
        self.surface.set_offset(row_x, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_animation::ManualScheduler;

    const FRAME: f32 = 1000.0 / 60.0;

    /// Headless carousel surface recording every slot rebinding
    struct FakeCarousel {
        viewport: Size,
        item_width: f32,
        bindings: Vec<(usize, usize)>,
        offsets: Vec<(f32, Option<f32>)>,
    }

    impl FakeCarousel {
        fn new(viewport_width: f32, item_width: f32) -> Self {
            Self {
                viewport: Size::new(viewport_width, 100.0),
                item_width,
                bindings: Vec::new(),
                offsets: Vec::new(),
            }
        }
    }

    impl CarouselSurface for FakeCarousel {
        fn viewport_size(&self) -> Size {
            self.viewport
        }

        fn item_width(&self) -> f32 {
            self.item_width
        }

        fn set_offset(&mut self, x: f32, transition_ms: Option<f32>) {
            self.offsets.push((x, transition_ms));
        }

        fn bind_item(&mut self, slot: usize, item: usize) {
            self.bindings.push((slot, item));
        }
    }

    struct Fixture {
        view: CircularView,
        surface: SharedSurface<FakeCarousel>,
        scheduler: ManualScheduler,
    }

    fn fixture(items: usize, viewport: f32, item_width: f32) -> Fixture {
        let scheduler = ManualScheduler::new();
        let surface = SharedSurface::new(FakeCarousel::new(viewport, item_width));
        let view = CircularView::new(
            Box::new(surface.clone()),
            items,
            CircularConfig::default(),
            Arc::new(scheduler.clock()),
            Arc::new(scheduler.clone()),
        )
        .unwrap();
        Fixture {
            view,
            surface,
            scheduler,
        }
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(-1, 6), 5);
        assert_eq!(wrap_index(6, 6), 0);
        assert_eq!(wrap_index(0, 6), 0);
        assert_eq!(wrap_index(-7, 6), 5);
        assert_eq!(wrap_index(13, 6), 1);
        assert_eq!(wrap_index(5, 0), 0);
    }

    #[test]
    fn test_initial_window_covers_viewport_plus_margins() {
        let f = fixture(10, 320.0, 100.0);
        // ceil(320 / 100) = 4 visible, plus one margin item per side
        assert_eq!(f.view.items_per_view(), 4);
        assert_eq!(f.view.window_items(), vec![9, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_slide_one_item_recycles_one_slot() {
        let f = fixture(10, 320.0, 100.0);
        let before = f.surface.lock().bindings.len();

        // Drag exactly one item-width left in a couple of moves
        let mut t = 0.0;
        f.view.handle_pointer(PointerEvent::press(200.0, 50.0, t));
        t += FRAME;
        f.view.handle_pointer(PointerEvent::moved(150.0, 50.0, t));
        t += FRAME;
        f.view.handle_pointer(PointerEvent::moved(100.0, 50.0, t));

        assert_eq!(f.view.window_items(), vec![0, 1, 2, 3, 4, 5]);
        let after = f.surface.lock().bindings.len();
        assert_eq!(after - before, 1, "one item crossed, one slot rebound");
    }

    #[test]
    fn test_fling_wraps_without_bounds() {
        let f = fixture(6, 320.0, 100.0);
        let clock = f.scheduler.clock();
        let mut t = clock.now_ms();
        f.view.handle_pointer(PointerEvent::press(300.0, 50.0, t));
        for step in 1..=4 {
            t += FRAME;
            clock.set(t);
            f.view
                .handle_pointer(PointerEvent::moved(300.0 - 40.0 * step as f32, 50.0, t));
        }
        f.view.handle_pointer(PointerEvent::release(140.0, 50.0, t));
        assert!(f.view.is_animating());

        f.scheduler.advance(4000.0);
        assert!(!f.view.is_animating());

        // Offset ran far past one revolution, the physical row never did
        let surface = f.surface.lock();
        for (x, _) in &surface.offsets {
            assert!((-200.0..=-100.0 + 1e-3).contains(x), "row offset {x} escaped");
        }
        // All bindings reference valid items
        for (_, item) in &surface.bindings {
            assert!(*item < 6);
        }
    }

    #[test]
    fn test_center_to_places_item_mid_viewport() {
        let f = fixture(10, 320.0, 100.0);
        f.view.center_to(5).unwrap();

        // Item 5 left edge at (320 - 100) / 2 = 110 means sx = 110 - 500
        assert_eq!(f.view.scroll_position().x, -390.0);
        let surface = f.surface.lock();
        let (_, transition) = surface.offsets.last().copied().unwrap();
        assert_eq!(transition, Some(CircularConfig::default().center_duration_ms));
    }

    #[test]
    fn test_center_to_unknown_item_errors() {
        let f = fixture(4, 320.0, 100.0);
        assert!(matches!(
            f.view.center_to(4),
            Err(Error::ItemOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn test_zero_width_items_scroll_nothing() {
        let f = fixture(10, 320.0, 0.0);
        assert_eq!(f.view.items_per_view(), 0);
        assert!(f.view.window_items().is_empty());
        // Gestures are ignored outright
        assert!(!f.view.handle_pointer(PointerEvent::press(200.0, 50.0, 0.0)));
        assert!(!f
            .view
            .handle_pointer(PointerEvent::moved(100.0, 50.0, 16.0)));
    }

    #[test]
    fn test_refresh_recomputes_items_per_view() {
        let f = fixture(10, 320.0, 100.0);
        assert_eq!(f.view.items_per_view(), 4);

        f.surface.lock().viewport = Size::new(520.0, 100.0);
        f.view.refresh();
        assert_eq!(f.view.items_per_view(), 6);
        assert_eq!(f.view.window_items().len(), 8);
    }
}
