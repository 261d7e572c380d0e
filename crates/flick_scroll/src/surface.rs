//! Rendering surface boundary
//!
//! The engine computes offsets; a [`ScrollSurface`] owns the visual element
//! that displays them. Hosts implement the trait over whatever they render
//! with (a DOM node, a layer tree, a terminal cell grid). The surface also
//! reports measurements, which the controller re-reads at every gesture
//! start because content can change size between gestures.

use std::sync::{Arc, Mutex, MutexGuard};

use flick_core::{Point, Size};

use crate::config::ScrollMethod;

/// The visual element a scroll view drives
pub trait ScrollSurface: Send {
    /// Size of the scrollable content
    fn content_size(&self) -> Size;

    /// Size of the clip viewport
    fn viewport_size(&self) -> Size;

    /// Apply a computed offset.
    ///
    /// `method` is the strategy fixed at view creation. `transition_ms`
    /// asks the surface to animate the write itself (hosts with CSS-style
    /// transitions); tick-driven animation always passes `None`.
    fn set_offset(&mut self, offset: Point, method: ScrollMethod, transition_ms: Option<f32>);

    /// Show or hide scroll indicator UI. Optional.
    fn set_scroll_bars_visible(&mut self, _visible: bool) {}
}

/// A write recorded by [`RecordingSurface`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedOffset {
    pub offset: Point,
    pub method: ScrollMethod,
    pub transition_ms: Option<f32>,
}

/// In-memory surface for tests and headless demos
///
/// Records every offset write so assertions can inspect the full rendered
/// trajectory, not just the final position.
#[derive(Debug)]
pub struct RecordingSurface {
    content: Size,
    viewport: Size,
    writes: Vec<RecordedOffset>,
    scroll_bars_visible: bool,
}

impl RecordingSurface {
    pub fn new(content: Size, viewport: Size) -> Self {
        Self {
            content,
            viewport,
            writes: Vec::new(),
            scroll_bars_visible: false,
        }
    }

    /// Change the reported content size (simulates content mutation)
    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
    }

    /// Change the reported viewport size (simulates a resize)
    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// All recorded writes, oldest first
    pub fn writes(&self) -> &[RecordedOffset] {
        &self.writes
    }

    /// The most recent offset, or zero if nothing was written
    pub fn last_offset(&self) -> Point {
        self.writes.last().map(|w| w.offset).unwrap_or(Point::ZERO)
    }

    pub fn scroll_bars_visible(&self) -> bool {
        self.scroll_bars_visible
    }
}

impl ScrollSurface for RecordingSurface {
    fn content_size(&self) -> Size {
        self.content
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn set_offset(&mut self, offset: Point, method: ScrollMethod, transition_ms: Option<f32>) {
        self.writes.push(RecordedOffset {
            offset,
            method,
            transition_ms,
        });
    }

    fn set_scroll_bars_visible(&mut self, visible: bool) {
        self.scroll_bars_visible = visible;
    }
}

/// A surface shared between a view and its host
///
/// Views take their surface by value; wrapping one in `SharedSurface` keeps
/// a handle on the host side for measurement updates and, in tests,
/// trajectory assertions.
pub struct SharedSurface<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedSurface<S> {
    pub fn new(surface: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    /// Access the wrapped surface
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock().unwrap()
    }
}

impl<S> Clone for SharedSurface<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ScrollSurface> ScrollSurface for SharedSurface<S> {
    fn content_size(&self) -> Size {
        self.lock().content_size()
    }

    fn viewport_size(&self) -> Size {
        self.lock().viewport_size()
    }

    fn set_offset(&mut self, offset: Point, method: ScrollMethod, transition_ms: Option<f32>) {
        self.lock().set_offset(offset, method, transition_ms);
    }

    fn set_scroll_bars_visible(&mut self, visible: bool) {
        self.lock().set_scroll_bars_visible(visible);
    }
}
