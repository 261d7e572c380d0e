//! Momentum scroll view controller
//!
//! [`ScrollView`] interprets a stream of normalized pointer events as drag
//! gestures, hands releases off to per-axis [`MomentumTracker`]s, and drives
//! a scheduler-timed animation loop that pushes computed offsets to a
//! [`ScrollSurface`].
//!
//! Views nest: each view optionally registers a parent at construction, and
//! a gesture locked to an axis the view cannot scroll is replayed onto the
//! nearest ancestor that can. Only one view along a parent chain may drag or
//! animate at a time; starting a gesture stops every ancestor first.
//!
//! # State machine
//!
//! One gesture runs `Idle -> Dragging -> {Momentum | Idle}`. `Momentum`
//! covers both tracker-driven deceleration and programmatic
//! [`animate_to`](ScrollView::animate_to) glides; both end in `Idle` with a
//! scroll-stop notification.
//!
//! Offsets are `<= 0`: scrolling content left/up makes the offset more
//! negative, and the valid range along an axis is `[max, 0]` where `max` is
//! the negated overflow.
//!
//! Registered callbacks are invoked while the view's internal lock is held;
//! they must not call back into the same view synchronously.

use std::sync::{Arc, Mutex, Weak};

use smallvec::SmallVec;
use tracing::{debug, trace};

use flick_animation::{Clock, MomentumTracker, TickId, TickScheduler};
use flick_core::events::{event_types, PointerEvent, PointerPhase};
use flick_core::{Axis, Point, Result, Size, StateTransitions};

use crate::config::ScrollConfig;
use crate::events::ScrollCallbacks;
use crate::surface::ScrollSurface;

/// Gesture phase of one view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// Nothing in flight
    Idle,
    /// A pointer is down and being tracked
    Dragging,
    /// Tracker-driven momentum or a programmatic glide is animating
    Momentum,
}

impl StateTransitions for GesturePhase {
    fn on_event(&self, event: u32) -> Option<Self> {
        use event_types::*;
        match (self, event) {
            (GesturePhase::Idle, POINTER_DOWN) => Some(GesturePhase::Dragging),
            (GesturePhase::Momentum, POINTER_DOWN) => Some(GesturePhase::Dragging),
            (GesturePhase::Dragging, FLING) => Some(GesturePhase::Momentum),
            (GesturePhase::Idle, FLING) => Some(GesturePhase::Momentum),
            (GesturePhase::Dragging, SETTLED) => Some(GesturePhase::Idle),
            (GesturePhase::Momentum, SETTLED) => Some(GesturePhase::Idle),
            _ => None,
        }
    }
}

/// Axis lock resolved once per gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DragLock {
    /// Not yet resolved (movement below threshold)
    #[default]
    Unresolved,
    /// Gesture follows the x axis only
    Horizontal,
    /// Gesture follows the y axis only
    Vertical,
    /// No dominant axis; both track the pointer
    Free,
}

impl From<Axis> for DragLock {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => DragLock::Horizontal,
            Axis::Vertical => DragLock::Vertical,
        }
    }
}

impl DragLock {
    fn allows(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (DragLock::Free, _)
                | (DragLock::Horizontal, Axis::Horizontal)
                | (DragLock::Vertical, Axis::Vertical)
        )
    }
}

/// Per-gesture bookkeeping, reset at every pointer press
#[derive(Default)]
struct DragState {
    start: Point,
    start_ms: f32,
    start_offset: Point,
    last: Point,
    last_move_ms: Option<f32>,
    speed_x: f32,
    speed_y: f32,
    lock: DragLock,
    did_drag: bool,
    /// Ancestor this gesture was handed to, if any
    delegate: Option<Weak<Mutex<ViewInner>>>,
}

impl DragState {
    fn begin(event: &PointerEvent, offset: Point) -> Self {
        Self {
            start: event.position(),
            start_ms: event.timestamp_ms,
            start_offset: offset,
            last: event.position(),
            ..Default::default()
        }
    }
}

/// A time-driven programmatic scroll segment
#[derive(Clone, Copy, Debug)]
struct Glide {
    from: Point,
    to: Point,
    start_ms: f32,
    duration_ms: f32,
}

pub(crate) struct ViewInner {
    config: ScrollConfig,
    surface: Box<dyn ScrollSurface>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn TickScheduler>,
    parent: Option<Weak<Mutex<ViewInner>>>,
    callbacks: ScrollCallbacks,

    phase: GesturePhase,
    /// A scroll-start notification has been emitted and its matching
    /// scroll-stop is still pending
    motion_live: bool,
    sx: f32,
    sy: f32,
    h_tracker: Option<MomentumTracker>,
    v_tracker: Option<MomentumTracker>,
    /// Scroll extents, negated overflow: valid positions are `[max, 0]`
    max_x: f32,
    max_y: f32,
    clip: Size,
    timer: Option<TickId>,
    glide: Option<Glide>,
    drag: DragState,
}

type InnerHandle = Arc<Mutex<ViewInner>>;

/// A momentum-scrolling region
///
/// Cheap to clone handle; clones refer to the same view.
#[derive(Clone)]
pub struct ScrollView {
    inner: InnerHandle,
}

impl ScrollView {
    /// Create a view over `surface`.
    ///
    /// Fails if `config` is invalid. The clock must be the same time source
    /// the host uses to stamp [`PointerEvent`]s.
    pub fn new(
        surface: Box<dyn ScrollSurface>,
        config: ScrollConfig,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Result<Self> {
        config.validate()?;
        let timings = config.tracker_timings();
        let h_tracker = config
            .direction
            .handles(Axis::Horizontal)
            .then(|| MomentumTracker::new(timings));
        let v_tracker = config
            .direction
            .handles(Axis::Vertical)
            .then(|| MomentumTracker::new(timings));

        Ok(Self {
            inner: Arc::new(Mutex::new(ViewInner {
                config,
                surface,
                clock,
                scheduler,
                parent: None,
                callbacks: ScrollCallbacks::new(),
                phase: GesturePhase::Idle,
                motion_live: false,
                sx: 0.0,
                sy: 0.0,
                h_tracker,
                v_tracker,
                max_x: 0.0,
                max_y: 0.0,
                clip: Size::default(),
                timer: None,
                glide: None,
                drag: DragState::default(),
            })),
        })
    }

    /// Register `parent` as the next view up the scroll hierarchy.
    ///
    /// Gestures along an axis this view cannot handle are replayed onto the
    /// nearest ancestor that can.
    pub fn set_parent(&self, parent: &ScrollView) {
        self.inner.lock().unwrap().parent = Some(Arc::downgrade(&parent.inner));
    }

    /// Feed one normalized pointer event.
    ///
    /// Returns `true` if the event was consumed by an active scroll
    /// interaction. A release that ends a gesture which never exceeded the
    /// move threshold returns `false`, so the host can deliver it as a tap
    /// or click to the element underneath.
    pub fn handle_pointer(&self, event: PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Press => ViewInner::drag_start(&self.inner, &event),
            PointerPhase::Move => ViewInner::drag_move(&self.inner, &event),
            PointerPhase::Release => ViewInner::drag_stop(&self.inner, &event),
        }
    }

    /// Current committed offset
    pub fn scroll_position(&self) -> Point {
        let g = self.inner.lock().unwrap();
        Point::new(g.sx, g.sy)
    }

    /// Whether momentum or a programmatic glide is in flight
    pub fn is_animating(&self) -> bool {
        self.inner.lock().unwrap().phase == GesturePhase::Momentum
    }

    /// Jump to `(x, y)` immediately, cancelling any animation in flight.
    ///
    /// The target is clamped to the current scroll extents.
    pub fn scroll_to(&self, x: f32, y: f32) {
        let mut g = self.inner.lock().unwrap();
        let was_live = g.phase != GesturePhase::Idle;
        g.halt_motion();
        g.measure_extents();
        g.sx = x.clamp(g.max_x, 0.0);
        g.sy = y.clamp(g.max_y, 0.0);
        g.apply_offset(None);
        g.callbacks.emit_update(Point::new(g.sx, g.sy));
        if was_live {
            g.settle();
        }
    }

    /// Animate to `(x, y)` over `duration_ms` through the configured easing
    /// curve. This is a plain time interpolation, not momentum.
    pub fn animate_to(&self, x: f32, y: f32, duration_ms: f32) {
        if duration_ms <= 0.0 {
            self.scroll_to(x, y);
            return;
        }
        {
            let mut g = self.inner.lock().unwrap();
            g.halt_motion();
            g.measure_extents();
            let to = Point::new(x.clamp(g.max_x, 0.0), y.clamp(g.max_y, 0.0));
            let now = g.clock.now_ms();
            g.glide = Some(Glide {
                from: Point::new(g.sx, g.sy),
                to,
                start_ms: now,
                duration_ms,
            });
            g.emit_motion_start();
            g.phase.apply(event_types::FLING);
        }
        ViewInner::schedule_tick(&self.inner);
    }

    /// Re-measure content and clip sizes after a content change, clamping
    /// the current offset into the new extents.
    pub fn refresh(&self) {
        let mut g = self.inner.lock().unwrap();
        g.measure_extents();
        let clamped = Point::new(g.sx.clamp(g.max_x, 0.0), g.sy.clamp(g.max_y, 0.0));
        if clamped != Point::new(g.sx, g.sy) {
            g.sx = clamped.x;
            g.sy = clamped.y;
            g.apply_offset(None);
            g.callbacks.emit_update(clamped);
        }
    }

    /// Register a scroll-start handler
    pub fn on_scroll_start(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.inner
            .lock()
            .unwrap()
            .callbacks
            .push_start(Box::new(handler));
    }

    /// Register a scroll-update handler, called with the current offset
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

impl ViewInner {
    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Collect live ancestors, nearest first
    fn ancestor_chain(this: &InnerHandle) -> SmallVec<[InnerHandle; 4]> {
        let mut chain: SmallVec<[InnerHandle; 4]> = SmallVec::new();
        let mut cursor = this.lock().unwrap().parent.clone();
        while let Some(weak) = cursor {
            match weak.upgrade() {
                Some(arc) => {
                    cursor = arc.lock().unwrap().parent.clone();
                    chain.push(arc);
                }
                None => break,
            }
        }
        chain
    }

    /// Nearest ancestor that scrolls `axis`
    fn find_axis_ancestor(this: &InnerHandle, axis: Axis) -> Option<InnerHandle> {
        Self::ancestor_chain(this)
            .into_iter()
            .find(|a| a.lock().unwrap().config.direction.handles(axis))
    }

    // ========================================================================
    // Gesture handling
    // ========================================================================

    fn drag_start(this: &InnerHandle, event: &PointerEvent) -> bool {
        // Only one view on a chain may be live: stop the ancestors first,
        // synchronously, before this view claims the gesture.
        for ancestor in Self::ancestor_chain(this) {
            ancestor.lock().unwrap().halt_and_settle();
        }

        let mut g = this.lock().unwrap();
        let interrupted = g.phase != GesturePhase::Idle;
        g.halt_and_settle();
        g.phase.apply(event_types::POINTER_DOWN);
        g.measure_extents();
        g.drag = DragState::begin(event, Point::new(g.sx, g.sy));
        debug!(
            x = event.x,
            y = event.y,
            max_x = g.max_x,
            max_y = g.max_y,
            interrupted,
            "drag started"
        );
        interrupted
    }

    fn drag_move(this: &InnerHandle, event: &PointerEvent) -> bool {
        let delegate = {
            let g = this.lock().unwrap();
            g.drag.delegate.clone()
        };
        if let Some(weak) = delegate {
            return match weak.upgrade() {
                Some(ancestor) => Self::drag_move(&ancestor, event),
                None => false,
            };
        }

        let mut g = this.lock().unwrap();
        if g.phase != GesturePhase::Dragging {
            return false;
        }

        if g.drag.lock == DragLock::Unresolved {
            let cum = event.position() - g.drag.start;
            let (ax, ay) = (cum.x.abs(), cum.y.abs());
            if ax < g.config.move_threshold && ay < g.config.move_threshold {
                // Below the drag threshold; probably a tap so far
                return false;
            }

            let ratio = g.config.direction_lock_ratio;
            let dominant = if ax > ay && ax >= ay * ratio {
                Some(Axis::Horizontal)
            } else if ay > ax && ay >= ax * ratio {
                Some(Axis::Vertical)
            } else {
                None
            };

            match dominant {
                Some(axis) if !g.config.direction.handles(axis) => {
                    drop(g);
                    if Self::try_delegate(this, axis, event) {
                        return true;
                    }
                    // No capable ancestor: keep the lock; the axis simply
                    // has no tracker here, so nothing will move.
                    g = this.lock().unwrap();
                    g.drag.lock = axis.into();
                }
                Some(axis) => g.drag.lock = axis.into(),
                None => g.drag.lock = DragLock::Free,
            }
            trace!(lock = ?g.drag.lock, "direction lock resolved");
        }

        g.drag.did_drag = true;

        let delta = event.position() - g.drag.last;
        g.drag.speed_x = 0.0;
        g.drag.speed_y = 0.0;
        let mut moved = false;
        if g.axis_live(Axis::Horizontal) {
            g.sx = g.dragged_position(Axis::Horizontal, delta.x);
            g.drag.speed_x = delta.x;
            moved = true;
        }
        if g.axis_live(Axis::Vertical) {
            g.sy = g.dragged_position(Axis::Vertical, delta.y);
            g.drag.speed_y = delta.y;
            moved = true;
        }
        g.drag.last = event.position();
        g.drag.last_move_ms = Some(event.timestamp_ms);

        if moved {
            g.emit_motion_start();
            g.apply_offset(None);
            g.callbacks.emit_update(Point::new(g.sx, g.sy));
        }
        true
    }

    fn drag_stop(this: &InnerHandle, event: &PointerEvent) -> bool {
        let delegate = {
            let mut g = this.lock().unwrap();
            let delegate = g.drag.delegate.take();
            if delegate.is_some() {
                // The ancestor owns the rest of the gesture
                g.phase.apply(event_types::SETTLED);
            }
            delegate
        };
        if let Some(weak) = delegate {
            return match weak.upgrade() {
                Some(ancestor) => Self::drag_stop(&ancestor, event),
                None => false,
            };
        }

        let mut g = this.lock().unwrap();
        if g.phase != GesturePhase::Dragging {
            return false;
        }

        if !g.drag.did_drag {
            // A tap: nothing scrolled, let the host deliver the click
            g.phase.apply(event_types::SETTLED);
            return false;
        }

        // Velocity only counts when the pointer was still moving just
        // before lift-off; a pause kills the fling.
        let fling = g
            .drag
            .last_move_ms
            .map(|last| event.timestamp_ms - last <= g.config.move_interval_threshold_ms)
            .unwrap_or(false);

        if g.config.paging_enabled {
            let tx = g.page_target(Axis::Horizontal);
            let ty = g.page_target(Axis::Vertical);
            let duration = g.config.snapback_duration_ms;
            let now = g.clock.now_ms();
            g.halt_motion();
            g.glide = Some(Glide {
                from: Point::new(g.sx, g.sy),
                to: Point::new(tx, ty),
                start_ms: now,
                duration_ms: duration,
            });
            g.phase.apply(event_types::FLING);
            debug!(tx, ty, "paging to boundary");
            drop(g);
            Self::schedule_tick(this);
            return true;
        }

        let now = g.clock.now_ms();
        let duration = g.config.scroll_duration_ms;
        let mut live = false;

        let (sx, max_x) = (g.sx, g.max_x);
        let speed_x = g.release_speed(Axis::Horizontal, fling);
        if let Some(t) = g.h_tracker.as_mut() {
            t.start(sx, speed_x, duration, max_x, 0.0, now);
            live |= !t.done();
        }
        let (sy, max_y) = (g.sy, g.max_y);
        let speed_y = g.release_speed(Axis::Vertical, fling);
        if let Some(t) = g.v_tracker.as_mut() {
            t.start(sy, speed_y, duration, max_y, 0.0, now);
            live |= !t.done();
        }

        if live {
            debug!(speed_x, speed_y, "momentum started");
            g.phase.apply(event_types::FLING);
            drop(g);
            Self::schedule_tick(this);
        } else {
            g.settle();
        }
        true
    }

    /// Replay the gesture onto the nearest ancestor that scrolls `axis`.
    fn try_delegate(this: &InnerHandle, axis: Axis, event: &PointerEvent) -> bool {
        let Some(ancestor) = Self::find_axis_ancestor(this, axis) else {
            return false;
        };

        let (start, start_ms) = {
            let g = this.lock().unwrap();
            (g.drag.start, g.drag.start_ms)
        };
        debug!(?axis, "delegating gesture to ancestor");
        Self::drag_start(&ancestor, &PointerEvent::press(start.x, start.y, start_ms));
        let consumed = Self::drag_move(&ancestor, event);

        let mut g = this.lock().unwrap();
        g.drag.delegate = Some(Arc::downgrade(&ancestor));
        consumed
    }

    // ========================================================================
    // Motion
    // ========================================================================

    /// One animation tick. Returns whether to re-arm.
    fn on_tick(&mut self) -> bool {
        if self.phase != GesturePhase::Momentum {
            self.timer = None;
            return false;
        }
        let now = self.clock.now_ms();

        if let Some(glide) = self.glide {
            let elapsed = now - glide.start_ms;
            let easing = self.config.easing;
            if elapsed >= glide.duration_ms {
                self.sx = glide.to.x;
                self.sy = glide.to.y;
                self.glide = None;
            } else {
                self.sx = easing.ease(elapsed, glide.from.x, glide.to.x - glide.from.x, glide.duration_ms);
                self.sy = easing.ease(elapsed, glide.from.y, glide.to.y - glide.from.y, glide.duration_ms);
            }
            self.apply_offset(None);
            self.callbacks.emit_update(Point::new(self.sx, self.sy));
            if self.glide.is_none() {
                self.timer = None;
                self.settle();
                return false;
            }
            return true;
        }

        let overshoot = self.config.overshoot_enabled;
        let mut live = false;
        if let Some(t) = self.h_tracker.as_mut() {
            if !t.done() {
                self.sx = t.update(overshoot, now);
                live |= !t.done();
            }
        }
        if let Some(t) = self.v_tracker.as_mut() {
            if !t.done() {
                self.sy = t.update(overshoot, now);
                live |= !t.done();
            }
        }

        self.apply_offset(None);
        self.callbacks.emit_update(Point::new(self.sx, self.sy));

        if live {
            true
        } else {
            self.timer = None;
            self.settle();
            false
        }
    }

    /// Arm the next animation tick, replacing any pending one.
    fn schedule_tick(this: &InnerHandle) {
        let mut g = this.lock().unwrap();
        let interval = g.config.tick_interval_ms();
        let scheduler = Arc::clone(&g.scheduler);
        if let Some(old) = g.timer.take() {
            scheduler.cancel(old);
        }
        let weak = Arc::downgrade(this);
        let id = scheduler.schedule(
            interval,
            Box::new(move || {
                // The view may be gone by the time the tick fires
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

    /// Cancel the pending tick and force both trackers to rest, keeping the
    /// last animated position as the committed offset.
    fn halt_motion(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
        self.glide = None;
        if let Some(t) = self.h_tracker.as_mut() {
            if !t.done() {
                self.sx = t.position();
            }
            t.reset();
        }
        if let Some(t) = self.v_tracker.as_mut() {
            if !t.done() {
                self.sy = t.position();
            }
            t.reset();
        }
    }

    /// [`halt_motion`](Self::halt_motion) plus phase/notification cleanup,
    /// for interrupting another view's (or a prior gesture's) motion.
    fn halt_and_settle(&mut self) {
        self.halt_motion();
        if self.phase != GesturePhase::Idle {
            self.settle();
        }
    }

    /// End of motion: notify and hide indicators
    fn settle(&mut self) {
        self.phase.apply(event_types::SETTLED);
        if self.motion_live {
            self.motion_live = false;
            self.show_scroll_bars(false);
            self.callbacks.emit_stop();
        }
        trace!(sx = self.sx, sy = self.sy, "settled");
    }

    /// Emit the scroll-start notification once per motion episode
    fn emit_motion_start(&mut self) {
        if !self.motion_live {
            self.motion_live = true;
            self.show_scroll_bars(true);
            self.callbacks.emit_start();
        }
    }

    // ========================================================================
    // Position helpers
    // ========================================================================

    fn measure_extents(&mut self) {
        let content = self.surface.content_size();
        self.clip = self.surface.viewport_size();
        self.max_x = -(content.width - self.clip.width).max(0.0);
        self.max_y = -(content.height - self.clip.height).max(0.0);
        if self.max_x == 0.0 && self.max_y == 0.0 {
            debug!("content does not overflow the viewport");
        }
    }

    /// Whether drag movement applies to `axis` under the current lock
    fn axis_live(&self, axis: Axis) -> bool {
        self.config.direction.handles(axis) && self.drag.lock.allows(axis)
    }

    /// New position for `axis` after a pointer delta, with elastic
    /// resistance (or a hard clamp) past the bounds.
    fn dragged_position(&self, axis: Axis, delta: f32) -> f32 {
        let (pos, max) = match axis {
            Axis::Horizontal => (self.sx, self.max_x),
            Axis::Vertical => (self.sy, self.max_y),
        };
        let candidate = pos + delta;
        if candidate > 0.0 || candidate < max {
            if self.config.overshoot_enabled {
                pos + delta * self.config.drag_resistance
            } else {
                candidate.clamp(max, 0.0)
            }
        } else {
            candidate
        }
    }

    /// Release velocity for `axis`: the last move delta, or zero when the
    /// pointer paused before lifting or the axis has no overflow to fling.
    fn release_speed(&self, axis: Axis, fling: bool) -> f32 {
        if !fling {
            return 0.0;
        }
        let (speed, max) = match axis {
            Axis::Horizontal => (self.drag.speed_x, self.max_x),
            Axis::Vertical => (self.drag.speed_y, self.max_y),
        };
        if max == 0.0 {
            // Nothing to scroll on this axis
            0.0
        } else {
            speed
        }
    }

    /// Page-snap target position for `axis` after a paged release
    fn page_target(&self, axis: Axis) -> f32 {
        let pos = match axis {
            Axis::Horizontal => self.sx,
            Axis::Vertical => self.sy,
        };
        if !self.axis_live(axis) {
            return pos;
        }
        let (max, page) = match axis {
            Axis::Horizontal => (self.max_x, self.clip.width),
            Axis::Vertical => (self.max_y, self.clip.height),
        };
        if page <= 0.0 || max == 0.0 {
            return pos;
        }

        let base = (-self.drag.start_offset.along(axis) / page).round();
        let travelled = self.drag.last.along(axis) - self.drag.start.along(axis);
        let step = if travelled <= -page * self.config.page_flip_ratio {
            1.0
        } else if travelled >= page * self.config.page_flip_ratio {
            -1.0
        } else {
            0.0
        };
        (-(base + step) * page).clamp(max, 0.0)
    }

    fn apply_offset(&mut self, transition_ms: Option<f32>) {
        let method = self.config.scroll_method;
        self.surface
            .set_offset(Point::new(self.sx, self.sy), method, transition_ms);
    }

    fn show_scroll_bars(&mut self, visible: bool) {
        if self.config.show_scroll_bars {
            self.surface.set_scroll_bars_visible(visible);
        }
    }
}
