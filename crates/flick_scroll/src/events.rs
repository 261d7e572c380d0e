//! Scroll notification callbacks
//!
//! Views report gesture/animation boundaries to the host through registered
//! callbacks: one scroll-start when motion begins, scroll-updates with the
//! current offset while it runs, and one scroll-stop when everything is at
//! rest. Callbacks may be invoked from a scheduler thread, so they are
//! `Send + Sync`.

use flick_core::Point;

/// Callback for scroll-start and scroll-stop
pub type BoundaryCallback = Box<dyn Fn() + Send + Sync>;

/// Callback for scroll-update, with the current offset
pub type UpdateCallback = Box<dyn Fn(Point) + Send + Sync>;

/// Registered notification handlers for one view
#[derive(Default)]
pub struct ScrollCallbacks {
    on_start: Vec<BoundaryCallback>,
    on_update: Vec<UpdateCallback>,
    on_stop: Vec<BoundaryCallback>,
}

impl ScrollCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_start(&mut self, callback: BoundaryCallback) {
        self.on_start.push(callback);
    }

    pub fn push_update(&mut self, callback: UpdateCallback) {
        self.on_update.push(callback);
    }

    pub fn push_stop(&mut self, callback: BoundaryCallback) {
        self.on_stop.push(callback);
    }

    pub fn emit_start(&self) {
        for callback in &self.on_start {
            callback();
        }
    }

    pub fn emit_update(&self, offset: Point) {
        for callback in &self.on_update {
            callback(offset);
        }
    }

    pub fn emit_stop(&self) {
        for callback in &self.on_stop {
            callback();
        }
    }
}
