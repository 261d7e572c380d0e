//! Tick scheduling
//!
//! Momentum animation is driven by a repeating one-shot timer: the
//! controller schedules a tick, the tick callback advances the trackers and
//! re-arms itself while motion is incomplete. [`TickScheduler`] is that
//! timer as an injected seam, so the animation loop is owned by whoever can
//! actually provide timing:
//!
//! - [`ManualScheduler`] is fully deterministic. Tests and headless demos
//!   call [`ManualScheduler::advance`] to fast-forward through an entire
//!   momentum animation without real waiting.
//! - [`ThreadScheduler`] runs a background worker for hosts without their
//!   own timer source.
//!
//! Cancellation is a first-class operation: starting a new gesture or
//! programmatic scroll must cancel the pending tick before resetting state,
//! otherwise two animation loops race over one element's position.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::clock::{Clock, ManualClock};

/// A scheduled tick callback
pub type TickCallback = Box<dyn FnOnce() + Send>;

new_key_type! {
    /// Handle to a pending tick
    pub struct TickId;
}

/// One-shot timer source
///
/// `schedule` runs `callback` once after roughly `delay_ms`; the callback
/// re-arms itself if it wants to keep ticking. `cancel` is a no-op for
/// ticks that already fired.
pub trait TickScheduler: Send + Sync {
    fn schedule(&self, delay_ms: f32, callback: TickCallback) -> TickId;
    fn cancel(&self, id: TickId);
}

// ============================================================================
// Manual Scheduler
// ============================================================================

struct ManualPending {
    due_ms: f32,
    seq: u64,
    callback: TickCallback,
}

struct ManualInner {
    pending: SlotMap<TickId, ManualPending>,
    next_seq: u64,
}

/// Deterministic scheduler driven by [`advance`](ManualScheduler::advance)
///
/// Shares a [`ManualClock`]: advancing the scheduler moves the clock, and
/// due callbacks observe the clock frozen at their due time, exactly like a
/// timer wheel would deliver them.
#[derive(Clone)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
    clock: ManualClock,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::with_clock(ManualClock::new())
    }

    pub fn with_clock(clock: ManualClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                pending: SlotMap::with_key(),
                next_seq: 0,
            })),
            clock,
        }
    }

    /// The clock this scheduler drives
    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    /// Number of ticks waiting to fire
    pub fn pending_count(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }

    /// Move time forward by `delta_ms`, firing every tick that comes due.
    ///
    /// Callbacks run outside the internal lock and may schedule further
    /// ticks; a re-armed tick that falls within the window fires in the
    /// same call.
    pub fn advance(&self, delta_ms: f32) {
        let target_ms = self.clock.now_ms() + delta_ms;

        loop {
            let next = {
                let mut inner = self.inner.lock().unwrap();
                let due_id = inner
                    .pending
                    .iter()
                    .filter(|(_, p)| p.due_ms <= target_ms)
                    .min_by(|(_, a), (_, b)| {
                        (a.due_ms, a.seq)
                            .partial_cmp(&(b.due_ms, b.seq))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|(id, _)| id);
                due_id.and_then(|id| inner.pending.remove(id))
            };

            match next {
                Some(pending) => {
                    // Deliver with the clock at the due time
                    if pending.due_ms > self.clock.now_ms() {
                        self.clock.set(pending.due_ms);
                    }
                    (pending.callback)();
                }
                None => break,
            }
        }

        self.clock.set(target_ms);
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&self, delay_ms: f32, callback: TickCallback) -> TickId {
        let mut inner = self.inner.lock().unwrap();
        let due_ms = self.clock.now_ms() + delay_ms.max(0.0);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.pending.insert(ManualPending {
            due_ms,
            seq,
            callback,
        })
    }

    fn cancel(&self, id: TickId) {
        self.inner.lock().unwrap().pending.remove(id);
    }
}

// ============================================================================
// Thread Scheduler
// ============================================================================

struct ThreadPending {
    due: Instant,
    callback: TickCallback,
}

struct ThreadShared {
    pending: Mutex<SlotMap<TickId, ThreadPending>>,
    condvar: Condvar,
    stop: AtomicBool,
}

/// Background-thread scheduler for hosts without a native timer source
///
/// A single worker sleeps until the earliest deadline, pops due entries and
/// runs them outside the queue lock. The worker is stopped and joined on
/// drop.
pub struct ThreadScheduler {
    shared: Arc<ThreadShared>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        let shared = Arc::new(ThreadShared {
            pending: Mutex::new(SlotMap::with_key()),
            condvar: Condvar::new(),
            stop: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("flick-ticks".into())
            .spawn(move || Self::run_worker(worker_shared))
            .ok();

        Self { shared, worker }
    }

    fn run_worker(shared: Arc<ThreadShared>) {
        let mut guard = shared.pending.lock().unwrap();
        loop {
            if shared.stop.load(Ordering::Acquire) {
                break;
            }

            let next = guard
                .iter()
                .min_by_key(|(_, p)| p.due)
                .map(|(id, p)| (id, p.due));

            match next {
                None => {
                    guard = shared.condvar.wait(guard).unwrap();
                }
                Some((id, due)) => {
                    let now = Instant::now();
                    if due <= now {
                        if let Some(pending) = guard.remove(id) {
                            drop(guard);
                            (pending.callback)();
                            guard = shared.pending.lock().unwrap();
                        }
                    } else {
                        let (g, _) = shared.condvar.wait_timeout(guard, due - now).unwrap();
                        guard = g;
                    }
                }
            }
        }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for ThreadScheduler {
    fn schedule(&self, delay_ms: f32, callback: TickCallback) -> TickId {
        let due = Instant::now() + Duration::from_secs_f64(f64::from(delay_ms.max(0.0)) / 1000.0);
        let id = self
            .shared
            .pending
            .lock()
            .unwrap()
            .insert(ThreadPending { due, callback });
        self.shared.condvar.notify_one();
        id
    }

    fn cancel(&self, id: TickId) {
        self.shared.pending.lock().unwrap().remove(id);
        self.shared.condvar.notify_one();
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.condvar.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_manual_fires_in_due_order() {
        let scheduler = ManualScheduler::new();
        let (tx, rx) = mpsc::channel();

        let tx_a = tx.clone();
        scheduler.schedule(30.0, Box::new(move || tx_a.send("late").unwrap()));
        let tx_b = tx.clone();
        scheduler.schedule(10.0, Box::new(move || tx_b.send("early").unwrap()));

        scheduler.advance(50.0);
        assert_eq!(rx.try_recv().unwrap(), "early");
        assert_eq!(rx.try_recv().unwrap(), "late");
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_manual_rearmed_tick_fires_in_same_window() {
        let scheduler = ManualScheduler::new();
        let (tx, rx) = mpsc::channel();

        let chain = scheduler.clone();
        scheduler.schedule(
            10.0,
            Box::new(move || {
                let tx = tx.clone();
                chain.schedule(10.0, Box::new(move || tx.send(()).unwrap()));
            }),
        );

        scheduler.advance(25.0);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_manual_cancel_prevents_firing() {
        let scheduler = ManualScheduler::new();
        let (tx, rx) = mpsc::channel::<()>();

        let id = scheduler.schedule(10.0, Box::new(move || tx.send(()).unwrap()));
        scheduler.cancel(id);
        scheduler.advance(100.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_manual_advances_clock_to_due_time() {
        let scheduler = ManualScheduler::new();
        let clock = scheduler.clock();
        let (tx, rx) = mpsc::channel();

        let cb_clock = scheduler.clock();
        scheduler.schedule(
            40.0,
            Box::new(move || tx.send(cb_clock.now_ms()).unwrap()),
        );

        scheduler.advance(100.0);
        assert_eq!(rx.try_recv().unwrap(), 40.0);
        assert_eq!(clock.now_ms(), 100.0);
    }

    #[test]
    fn test_thread_scheduler_fires() {
        let scheduler = ThreadScheduler::new();
        let (tx, rx) = mpsc::channel();

        scheduler.schedule(10.0, Box::new(move || tx.send(()).unwrap()));
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn test_thread_scheduler_cancel() {
        let scheduler = ThreadScheduler::new();
        let (tx, rx) = mpsc::channel::<()>();

        let id = scheduler.schedule(200.0, Box::new(move || tx.send(()).unwrap()));
        scheduler.cancel(id);
        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    }
}
