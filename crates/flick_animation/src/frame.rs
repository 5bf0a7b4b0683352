//! Frame scheduling
//!
//! The animator never talks to the host's frame timing API directly. It asks
//! an injected [`FrameScheduler`] for "call me on the next frame" and keeps
//! the returned handle so the request can be cancelled.
//!
//! Two implementations are provided:
//!
//! - [`FrameLoop`] - the platform path. The host calls
//!   [`FrameLoop::dispatch_frame`] once per display refresh (vsync), the same
//!   way an event loop reacts to a frame event.
//! - [`TimerScheduler`] - the fallback when no frame signal exists. Frames are
//!   spaced at least [`FALLBACK_FRAME_INTERVAL_MS`] apart.
//!
//! [`select_scheduler`] picks one at startup.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

/// Minimum spacing between fallback timer frames (~60fps)
pub const FALLBACK_FRAME_INTERVAL_MS: f64 = 16.0;

// ============================================================================
// Clocks
// ============================================================================

/// Source of wall-clock time in milliseconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Monotonic clock measured from its creation
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can hold one copy and hand
/// another to a scheduler.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a specific time
    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

// ============================================================================
// Scheduler Interface
// ============================================================================

new_key_type! {
    /// Handle to a requested frame callback
    pub struct FrameHandle;
}

/// Callback run once on the next frame with the frame timestamp (ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host frame timing primitive
pub trait FrameScheduler {
    /// Current wall-clock time in milliseconds
    fn now(&self) -> f64;

    /// Run `callback` once on the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending callback. Unknown or already-run handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Run the callbacks that are due now. Returns how many ran.
    ///
    /// A host with its own frame signal calls its native entry point
    /// instead; a host relying on the fallback calls this from its loop.
    fn pump(&self) -> usize;

    /// Number of callbacks still waiting
    fn pending_frames(&self) -> usize;
}

// ============================================================================
// Platform Frame Loop
// ============================================================================

/// Host-driven frame scheduler
///
/// Callbacks requested before a [`dispatch_frame`](Self::dispatch_frame) call
/// run during it; callbacks requested while a frame is being dispatched wait
/// for the next one.
pub struct FrameLoop<C: Clock = SystemClock> {
    clock: C,
    callbacks: RefCell<SlotMap<FrameHandle, FrameCallback>>,
    queue: RefCell<VecDeque<FrameHandle>>,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            callbacks: RefCell::new(SlotMap::with_key()),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Run one frame. Returns how many callbacks ran.
    pub fn dispatch_frame(&self) -> usize {
        let timestamp = self.clock.now();
        let batch: Vec<FrameHandle> = self.queue.borrow_mut().drain(..).collect();

        let mut ran = 0;
        for handle in batch {
            // Release the borrow before running: callbacks re-enter request_frame.
            let callback = self.callbacks.borrow_mut().remove(handle);
            if let Some(callback) = callback {
                callback(timestamp);
                ran += 1;
            }
        }
        ran
    }
}

impl FrameLoop<ManualClock> {
    /// Advance the clock by `interval_ms` and dispatch, `count` times
    pub fn run_frames(&self, count: usize, interval_ms: f64) {
        for _ in 0..count {
            self.clock.advance(interval_ms);
            self.dispatch_frame();
        }
    }

    /// Keep dispatching frames until nothing is pending or `max_frames` ran.
    /// Returns the number of frames dispatched.
    pub fn run_until_idle(&self, interval_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.pending() > 0 && frames < max_frames {
            self.clock.advance(interval_ms);
            self.dispatch_frame();
            frames += 1;
        }
        frames
    }
}

impl<C: Clock> FrameScheduler for FrameLoop<C> {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.callbacks.borrow_mut().insert(callback);
        self.queue.borrow_mut().push_back(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.callbacks.borrow_mut().remove(handle);
    }

    fn pump(&self) -> usize {
        self.dispatch_frame()
    }

    fn pending_frames(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

// ============================================================================
// Timer Fallback
// ============================================================================

struct TimedFrame {
    due: f64,
    callback: FrameCallback,
}

/// Timer-based frame scheduler for hosts without a frame signal
///
/// A request made at time `now` fires at `max(last_fire + 16, now)`, so
/// frames never come faster than ~60fps however often they are requested.
pub struct TimerScheduler<C: Clock = SystemClock> {
    clock: C,
    last_fire: Cell<f64>,
    timers: RefCell<SlotMap<FrameHandle, TimedFrame>>,
}

impl TimerScheduler<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Block the current thread, firing timers as they come due, until no
    /// timer is left.
    pub fn run_until_idle(&self) {
        while let Some(deadline) = self.next_deadline() {
            let wait = deadline - self.clock.now();
            if wait > 0.0 {
                std::thread::sleep(Duration::from_secs_f64(wait / 1000.0));
            }
            self.run_due();
        }
    }
}

impl Default for TimerScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerScheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last_fire: Cell::new(f64::NEG_INFINITY),
            timers: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .borrow()
            .values()
            .map(|timer| timer.due)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Fire every timer whose deadline has passed, earliest first.
    /// Returns how many fired.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let mut due: Vec<(FrameHandle, f64)> = self
            .timers
            .borrow()
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .map(|(handle, timer)| (handle, timer.due))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut fired = 0;
        for (handle, _) in due {
            let timer = self.timers.borrow_mut().remove(handle);
            if let Some(timer) = timer {
                self.last_fire.set(timer.due);
                (timer.callback)(timer.due);
                fired += 1;
            }
        }
        fired
    }
}

impl<C: Clock> FrameScheduler for TimerScheduler<C> {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let now = self.clock.now();
        let due = (self.last_fire.get() + FALLBACK_FRAME_INTERVAL_MS).max(now);
        self.timers
            .borrow_mut()
            .insert(TimedFrame { due, callback })
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.timers.borrow_mut().remove(handle);
    }

    fn pump(&self) -> usize {
        self.run_due()
    }

    fn pending_frames(&self) -> usize {
        self.timers.borrow().len()
    }
}

/// Pick the frame scheduler for this host
///
/// Uses the platform's frame signal when one is offered, otherwise falls
/// back to a [`TimerScheduler`]. The fallback has no thread of its own:
/// whoever holds the returned scheduler drives it with
/// [`FrameScheduler::pump`].
pub fn select_scheduler(platform: Option<Rc<dyn FrameScheduler>>) -> Rc<dyn FrameScheduler> {
    match platform {
        Some(scheduler) => {
            tracing::debug!("select_scheduler: using platform frame scheduler");
            scheduler
        }
        None => {
            tracing::debug!(
                "select_scheduler: no platform frame signal, falling back to {}ms timer",
                FALLBACK_FRAME_INTERVAL_MS
            );
            Rc::new(TimerScheduler::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_loop_runs_queued_callbacks_once() {
        let clock = ManualClock::new();
        let frames = FrameLoop::new(clock.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        frames.request_frame(Box::new(move |ts| log.borrow_mut().push(ts)));

        clock.advance(16.0);
        assert_eq!(frames.dispatch_frame(), 1);
        assert_eq!(frames.dispatch_frame(), 0);
        assert_eq!(*seen.borrow(), vec![16.0]);
    }

    #[test]
    fn test_frame_loop_cancel() {
        let frames = FrameLoop::new(ManualClock::new());
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        let handle = frames.request_frame(Box::new(move |_| flag.set(true)));
        frames.cancel_frame(handle);
        // Cancelling twice is harmless
        frames.cancel_frame(handle);

        frames.run_frames(1, 16.0);
        assert!(!fired.get());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_frame_loop_defers_requests_made_during_dispatch() {
        let frames = Rc::new(FrameLoop::new(ManualClock::new()));
        let count = Rc::new(Cell::new(0));

        let inner_frames = Rc::clone(&frames);
        let inner_count = Rc::clone(&count);
        frames.request_frame(Box::new(move |_| {
            inner_count.set(inner_count.get() + 1);
            let nested = Rc::clone(&inner_count);
            inner_frames.request_frame(Box::new(move |_| nested.set(nested.get() + 1)));
        }));

        frames.run_frames(1, 16.0);
        assert_eq!(count.get(), 1);
        assert_eq!(frames.pending(), 1);

        frames.run_frames(1, 16.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_timer_spacing() {
        let clock = ManualClock::starting_at(1000.0);
        let timers = TimerScheduler::with_clock(clock.clone());
        let stamps = Rc::new(RefCell::new(Vec::new()));

        // First request fires immediately
        let log = Rc::clone(&stamps);
        timers.request_frame(Box::new(move |ts| log.borrow_mut().push(ts)));
        assert_eq!(timers.run_due(), 1);

        // Second request is pushed 16ms past the last fire
        let log = Rc::clone(&stamps);
        timers.request_frame(Box::new(move |ts| log.borrow_mut().push(ts)));
        assert_eq!(timers.next_deadline(), Some(1016.0));
        assert_eq!(timers.run_due(), 0);

        clock.advance(16.0);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(*stamps.borrow(), vec![1000.0, 1016.0]);
    }

    #[test]
    fn test_timer_late_request_is_not_delayed() {
        let clock = ManualClock::starting_at(0.0);
        let timers = TimerScheduler::with_clock(clock.clone());
        timers.request_frame(Box::new(|_| {}));
        timers.run_due();

        clock.advance(100.0);
        timers.request_frame(Box::new(|_| {}));
        assert_eq!(timers.next_deadline(), Some(100.0));
    }

    #[test]
    fn test_timer_run_until_idle() {
        let timers = TimerScheduler::new();
        let fired = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let fired = Rc::clone(&fired);
            timers.request_frame(Box::new(move |_| fired.set(fired.get() + 1)));
        }
        timers.run_until_idle();
        assert_eq!(fired.get(), 2);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_select_scheduler_prefers_platform() {
        let clock = ManualClock::starting_at(42.0);
        let platform: Rc<dyn FrameScheduler> = Rc::new(FrameLoop::new(clock));
        let selected = select_scheduler(Some(platform));
        assert_eq!(selected.now(), 42.0);

        let fallback = select_scheduler(None);
        assert!(fallback.now() >= 0.0);
    }

    #[test]
    fn test_fallback_is_driven_by_pump() {
        let fallback = select_scheduler(None);
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        fallback.request_frame(Box::new(move |_| flag.set(true)));
        assert_eq!(fallback.pending_frames(), 1);

        // The first request is due immediately
        assert_eq!(fallback.pump(), 1);
        assert!(fired.get());
        assert_eq!(fallback.pending_frames(), 0);
        assert_eq!(fallback.pump(), 0);
    }

    #[test]
    fn test_frame_loop_pump_dispatches_a_frame() {
        let clock = ManualClock::starting_at(5.0);
        let frames: Rc<dyn FrameScheduler> = Rc::new(FrameLoop::new(clock));
        let stamp = Rc::new(Cell::new(0.0));

        let seen = Rc::clone(&stamp);
        frames.request_frame(Box::new(move |ts| seen.set(ts)));
        assert_eq!(frames.pending_frames(), 1);
        assert_eq!(frames.pump(), 1);
        assert_eq!(stamp.get(), 5.0);
    }
}
