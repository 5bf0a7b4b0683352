//! Property tweening
//!
//! [`Animator::to`] moves the bound property from its value at call time to a
//! destination over a duration, sampling the easing curve once per frame.
//! At most one run is active per animator: starting a run cancels the
//! previous one, so two loops never write the property at the same time.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::easing::EasingFn;
use crate::frame::{FrameHandle, FrameScheduler};
use crate::property::PropertyBinding;

/// Called with the property value after every write
pub type ChangeCallback = Rc<dyn Fn(f64)>;

/// Called once with the destination when a run completes
pub type CompleteCallback = Box<dyn FnOnce(f64)>;

struct AnimationRun {
    id: u64,
    from: f64,
    to: f64,
    duration: f64,
    easing: EasingFn,
    started_at: f64,
    on_change: ChangeCallback,
    on_complete: Option<CompleteCallback>,
}

struct AnimatorInner {
    binding: PropertyBinding,
    scheduler: Rc<dyn FrameScheduler>,
    fixed: bool,
    /// Id of the run allowed to write; bumped on every start and cancel
    generation: Cell<u64>,
    pending: Cell<Option<FrameHandle>>,
}

/// Frame-driven tween of one bound property
#[derive(Clone)]
pub struct Animator {
    inner: Rc<AnimatorInner>,
}

/// Non-owning handle to an [`Animator`]
///
/// Completion callbacks that need the animator again capture this, so a
/// pending frame never keeps its own animator alive.
#[derive(Clone)]
pub struct WeakAnimator {
    inner: Weak<AnimatorInner>,
}

impl WeakAnimator {
    pub fn upgrade(&self) -> Option<Animator> {
        self.inner.upgrade().map(|inner| Animator { inner })
    }
}

impl Animator {
    /// Create an animator. A `fixed` animator never writes or schedules.
    pub fn new(binding: PropertyBinding, scheduler: Rc<dyn FrameScheduler>, fixed: bool) -> Self {
        Self {
            inner: Rc::new(AnimatorInner {
                binding,
                scheduler,
                fixed,
                generation: Cell::new(0),
                pending: Cell::new(None),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakAnimator {
        WeakAnimator {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn binding(&self) -> &PropertyBinding {
        &self.inner.binding
    }

    pub fn scheduler(&self) -> &Rc<dyn FrameScheduler> {
        &self.inner.scheduler
    }

    pub fn is_fixed(&self) -> bool {
        self.inner.fixed
    }

    /// Whether a frame is scheduled for the current run
    pub fn is_running(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    /// Stop the current run, if any. The cancelled run never writes again.
    pub fn cancel(&self) {
        let inner = &self.inner;
        inner.generation.set(inner.generation.get() + 1);
        if let Some(handle) = inner.pending.take() {
            tracing::trace!("Animator: cancelled pending frame for '{}'", inner.binding.key());
            inner.scheduler.cancel_frame(handle);
        }
    }

    /// Animate the property to `destination` over `duration` milliseconds
    ///
    /// The first frame is evaluated immediately. On the last frame the
    /// property is set to `destination` exactly, then `on_change` and
    /// `on_complete` run with it.
    pub fn to(
        &self,
        destination: f64,
        duration: f64,
        easing: EasingFn,
        on_change: ChangeCallback,
        on_complete: CompleteCallback,
    ) {
        if self.inner.fixed {
            tracing::trace!("Animator: fixed, ignoring run to {}", destination);
            return;
        }

        self.cancel();

        let started_at = self.inner.scheduler.now();
        let run = AnimationRun {
            id: self.inner.generation.get(),
            from: self.inner.binding.get(),
            to: destination,
            duration,
            easing,
            started_at,
            on_change,
            on_complete: Some(on_complete),
        };

        tracing::debug!(
            "Animator: '{}' {} -> {} over {}ms",
            self.inner.binding.key(),
            run.from,
            run.to,
            run.duration
        );

        step(&self.inner, run, started_at);
    }
}

/// Evaluate one frame of `run` at `now`
fn step(inner: &Rc<AnimatorInner>, mut run: AnimationRun, now: f64) {
    if inner.generation.get() != run.id {
        return;
    }

    let elapsed = now - run.started_at;

    // `!(a < b)` also finishes runs whose duration is NaN
    if !(elapsed < run.duration) {
        inner.pending.set(None);
        inner.binding.set(run.to);
        (run.on_change)(run.to);
        if let Some(on_complete) = run.on_complete.take() {
            on_complete(run.to);
        }
        return;
    }

    let value = run.from + (run.to - run.from) * (run.easing)(elapsed / run.duration);
    inner.binding.set(value);
    tracing::trace!("Animator: '{}' = {}", inner.binding.key(), value);

    let on_change = Rc::clone(&run.on_change);
    let weak: Weak<AnimatorInner> = Rc::downgrade(inner);
    let handle = inner.scheduler.request_frame(Box::new(move |timestamp| {
        if let Some(inner) = weak.upgrade() {
            step(&inner, run, timestamp);
        }
    }));
    inner.pending.set(Some(handle));

    on_change(value);
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("binding", &self.inner.binding)
            .field("fixed", &self.inner.fixed)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::{ease, linear};
    use crate::frame::{FrameLoop, ManualClock};
    use crate::property::PropertyBag;
    use std::cell::RefCell;

    fn setup(initial: f64, fixed: bool) -> (Rc<FrameLoop<ManualClock>>, PropertyBinding, Animator) {
        let frames = Rc::new(FrameLoop::new(ManualClock::new()));
        let target = Rc::new(PropertyBag::new().with("y", initial));
        let binding = PropertyBinding::new(target, "y");
        let animator = Animator::new(binding.clone(), frames.clone(), fixed);
        (frames, binding, animator)
    }

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, ChangeCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, Rc::new(move |v| sink.borrow_mut().push(v)))
    }

    #[test]
    fn test_weak_handle_does_not_own() {
        let (frames, _binding, animator) = setup(0.0, false);
        let weak = animator.downgrade();
        assert!(weak.upgrade().is_some());

        animator.to(10.0, 100.0, ease, Rc::new(|_| {}), Box::new(|_| {}));
        assert_eq!(frames.pending(), 1);

        drop(animator);
        assert!(weak.upgrade().is_none());
        // The orphaned frame exits without touching anything
        frames.run_until_idle(16.0, 10);
    }

    #[test]
    fn test_lands_exactly_on_destination() {
        let (frames, binding, animator) = setup(0.0, false);
        let done = Rc::new(Cell::new(None));

        let slot = Rc::clone(&done);
        animator.to(
            123.456,
            600.0,
            ease,
            Rc::new(|_| {}),
            Box::new(move |v| slot.set(Some(v))),
        );

        frames.run_frames(30, 17.0);
        assert!(done.get().is_none());
        frames.run_until_idle(17.0, 100);

        assert_eq!(binding.get(), 123.456);
        assert_eq!(done.get(), Some(123.456));
        assert!(!animator.is_running());
    }

    #[test]
    fn test_samples_easing_curve() {
        let (frames, binding, animator) = setup(100.0, false);
        animator.to(200.0, 100.0, linear, Rc::new(|_| {}), Box::new(|_| {}));

        // First frame runs synchronously at elapsed 0
        assert_eq!(binding.get(), 100.0);

        frames.run_frames(1, 25.0);
        assert!((binding.get() - 125.0).abs() < 1e-9);

        frames.run_frames(1, 25.0);
        assert!((binding.get() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_fires_every_frame_then_complete() {
        let (frames, _binding, animator) = setup(0.0, false);
        let (changes, on_change) = recorder();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&order);
        let changes_at_complete = Rc::clone(&changes);
        animator.to(
            10.0,
            32.0,
            linear,
            on_change,
            Box::new(move |v| {
                log.borrow_mut().push(changes_at_complete.borrow().len());
                assert_eq!(v, 10.0);
            }),
        );
        frames.run_frames(2, 16.0);

        // elapsed 0, 16, 32 -> three change calls, complete after the last
        assert_eq!(*changes.borrow(), vec![0.0, 5.0, 10.0]);
        assert_eq!(*order.borrow(), vec![3]);
    }

    #[test]
    fn test_zero_duration_completes_synchronously() {
        let (frames, binding, animator) = setup(5.0, false);
        let done = Rc::new(Cell::new(false));

        let flag = Rc::clone(&done);
        animator.to(50.0, 0.0, ease, Rc::new(|_| {}), Box::new(move |_| flag.set(true)));

        assert!(done.get());
        assert_eq!(binding.get(), 50.0);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_fixed_animator_is_noop() {
        let (frames, binding, animator) = setup(7.0, true);
        let (changes, on_change) = recorder();
        let done = Rc::new(Cell::new(false));

        let flag = Rc::clone(&done);
        animator.to(99.0, 0.0, ease, on_change, Box::new(move |_| flag.set(true)));

        assert_eq!(binding.get(), 7.0);
        assert!(changes.borrow().is_empty());
        assert!(!done.get());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_new_run_cancels_previous() {
        let (frames, binding, animator) = setup(0.0, false);
        let first_done = Rc::new(Cell::new(false));

        let flag = Rc::clone(&first_done);
        animator.to(1000.0, 500.0, ease, Rc::new(|_| {}), Box::new(move |_| flag.set(true)));
        frames.run_frames(3, 16.0);

        animator.to(-50.0, 100.0, ease, Rc::new(|_| {}), Box::new(|_| {}));
        assert_eq!(frames.pending(), 1);
        frames.run_until_idle(16.0, 100);

        assert!(!first_done.get());
        assert_eq!(binding.get(), -50.0);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let (frames, binding, animator) = setup(3.0, false);
        animator.cancel();
        animator.cancel();
        assert_eq!(binding.get(), 3.0);
        assert_eq!(frames.pending(), 0);
        assert!(!animator.is_running());
    }

    #[test]
    fn test_complete_can_chain_another_run() {
        let (frames, binding, animator) = setup(0.0, false);
        let finished = Rc::new(Cell::new(false));

        let chained = animator.clone();
        let flag = Rc::clone(&finished);
        animator.to(
            100.0,
            50.0,
            ease,
            Rc::new(|_| {}),
            Box::new(move |_| {
                chained.to(80.0, 50.0, ease, Rc::new(|_| {}), Box::new(move |_| flag.set(true)));
            }),
        );

        frames.run_until_idle(16.0, 100);
        assert!(finished.get());
        assert_eq!(binding.get(), 80.0);
    }
}
