//! Release-time motion planning
//!
//! When the finger lifts, the planner picks one of three motions:
//!
//! 1. **Rebound** - the property is past a bound: spring back to it
//! 2. **Inertia** - a quick throw: coast with constant deceleration, clamped
//!    into the elastic region past the bounds, then settle or snap
//! 3. **Correction** - otherwise: snap to the nearest step, if configured
//!
//! The decisions are pure functions ([`plan_release`], [`project_inertia`],
//! [`correction_target`]); [`MotionPlanner`] turns them into animator runs.

use std::cell::Cell;
use std::rc::Rc;

use flick_animation::easing::{ease, reverse_ease};
use flick_animation::{Animator, EasingFn, WeakAnimator};

use crate::config::FlickConfig;
use crate::gesture::SPEED_WINDOW_MS;
use crate::hooks::FlickHooks;

/// Spring back from past a bound on release
pub const REBOUND_DURATION_MS: f64 = 200.0;
/// Settle back inside the bounds after an inertial overshoot
pub const SETTLE_DURATION_MS: f64 = 600.0;
/// Snap to the nearest step
pub const CORRECTION_DURATION_MS: f64 = 400.0;
/// Default duration of programmatic moves
pub const EXPOSE_DURATION_MS: f64 = 600.0;

/// What the gesture looked like when the finger lifted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleaseInput {
    /// Property value at release
    pub current: f64,
    /// Release was a tap
    pub tap: bool,
    /// The session was direction-locked out
    pub locked_out: bool,
    /// Milliseconds since the speed anchor
    pub elapsed: f64,
    /// Tracked-axis travel since the speed anchor, scaled by sensitivity
    pub distance: f64,
}

/// An inertial throw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InertiaPlan {
    pub destination: f64,
    pub duration: f64,
}

/// The motion chosen on release
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReleasePlan {
    /// Animate back to a bound
    Rebound { bound: f64 },
    /// Coast to a projected destination
    Inertia(InertiaPlan),
    /// Snap to the nearest step (no-op without a step)
    Correct,
}

/// Choose the release motion. Rebound always wins over inertia and steps.
pub fn plan_release(config: &FlickConfig, input: &ReleaseInput) -> ReleasePlan {
    if let Some(bound) = config.exceeded_bound(input.current) {
        return ReleasePlan::Rebound { bound };
    }

    if config.inertia && !input.tap && !input.locked_out && input.elapsed < SPEED_WINDOW_MS {
        return ReleasePlan::Inertia(project_inertia(
            config,
            input.current,
            input.distance,
            input.elapsed,
        ));
    }

    ReleasePlan::Correct
}

/// Project where a throw of `distance` over `elapsed` ms comes to rest
///
/// The stopping distance under constant deceleration `a` from speed `v` is
/// `v² / 2a`. A destination past a bound is pulled back to at most
/// `spring_max_region` beyond it, scaled by how far the raw projection
/// overshoots relative to `max_region`. The duration is shortened by the
/// time the eased curve needs to cover the clamped share of the distance.
pub fn project_inertia(
    config: &FlickConfig,
    current: f64,
    distance: f64,
    elapsed: f64,
) -> InertiaPlan {
    let elapsed = elapsed.max(1.0);
    let speed = distance.abs() / elapsed;
    let mut projected = config.factor * speed;
    if let Some(max_speed) = config.max_speed {
        projected = projected.min(max_speed);
    }

    let direction = if distance < 0.0 { -1.0 } else { 1.0 };
    let mut destination =
        current + projected * projected / (2.0 * config.deceleration) * direction;
    let mut time_ratio = 1.0;

    let spring_region = |overshoot: f64| {
        if overshoot > config.max_region {
            config.spring_max_region
        } else {
            config.spring_max_region * overshoot / config.max_region
        }
    };

    if let Some(min) = config.min.filter(|min| destination < *min) {
        let region = spring_region(min - destination);
        time_ratio = reverse_ease((current - min + region) / (current - destination));
        destination = min - region;
    } else if let Some(max) = config.max.filter(|max| destination > *max) {
        let region = spring_region(destination - max);
        time_ratio = reverse_ease((max + region - current) / (destination - current));
        destination = max + region;
    }

    InertiaPlan {
        destination: round_half_up(destination),
        duration: (speed / config.deceleration).round() * time_ratio,
    }
}

/// Round to the nearest integer, halves toward positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Nearest multiple of `step` to `value`, clamped into the bounds
///
/// Rounds half toward zero: a remainder of exactly `step / 2` snaps down.
pub fn correction_target(value: f64, step: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let repeat = (value / step).abs().floor();
    let remainder = value % step;
    let sign = if value < 0.0 { -1.0 } else { 1.0 };

    let mut target = if remainder.abs() > step / 2.0 {
        sign * (repeat + 1.0) * step
    } else {
        sign * repeat * step
    };

    if let Some(max) = max {
        if target > max {
            target = max;
        }
    }
    if let Some(min) = min {
        if target < min {
            target = min;
        }
    }
    target
}

/// Page index of `value`, counted in steps down from `max`
pub fn page_index(config: &FlickConfig, value: f64) -> Option<i64> {
    match (config.min, config.max, config.step) {
        (Some(_), Some(max), Some(step)) => Some(((max - value) / step).round() as i64),
        _ => None,
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Runs release plans on the animator and fires the end hooks
#[derive(Clone)]
pub(crate) struct MotionPlanner {
    config: Rc<FlickConfig>,
    hooks: FlickHooks,
    animator: Animator,
    page: Rc<Cell<Option<i64>>>,
}

impl MotionPlanner {
    pub(crate) fn new(config: Rc<FlickConfig>, hooks: FlickHooks, animator: Animator) -> Self {
        let page = Rc::new(Cell::new(page_index(&config, animator.binding().get())));
        Self {
            config,
            hooks,
            animator,
            page,
        }
    }

    /// Handle for completion callbacks; the animator they run on must not
    /// be kept alive by its own pending frame
    fn downgrade(&self) -> WeakPlanner {
        WeakPlanner {
            config: Rc::clone(&self.config),
            hooks: self.hooks.clone(),
            animator: self.animator.downgrade(),
            page: Rc::clone(&self.page),
        }
    }

    pub(crate) fn current_page(&self) -> Option<i64> {
        self.page.get()
    }

    pub(crate) fn update_page(&self) {
        self.page
            .set(page_index(&self.config, self.animator.binding().get()));
    }

    pub(crate) fn release(&self, input: &ReleaseInput) {
        let plan = plan_release(&self.config, input);
        tracing::debug!("planner: release {:?} -> {:?}", input, plan);

        match plan {
            ReleasePlan::Rebound { bound } => self.rebound(bound),
            ReleasePlan::Inertia(throw) => self.throw(throw),
            ReleasePlan::Correct => self.correct(),
        }
    }

    fn rebound(&self, bound: f64) {
        let hooks = self.hooks.clone();
        self.animator.to(
            bound,
            REBOUND_DURATION_MS,
            ease,
            Rc::clone(&self.hooks.change),
            Box::new(move |value| {
                (hooks.rebound_end)(value);
                (hooks.animation_end)(value);
            }),
        );
    }

    fn throw(&self, plan: InertiaPlan) {
        let planner = self.downgrade();
        self.animator.to(
            plan.destination,
            plan.duration,
            ease,
            Rc::clone(&self.hooks.change),
            Box::new(move |value| {
                if let Some(live) = planner.upgrade() {
                    live.after_throw(value);
                }
            }),
        );
    }

    /// A throw came to rest: settle back inside the bounds, or snap
    fn after_throw(&self, value: f64) {
        let current = self.animator.binding().get();
        if let Some(bound) = self.config.exceeded_bound(current) {
            tracing::debug!("planner: settling overshoot {} back to {}", current, bound);
            self.animator.cancel();
            let hooks = self.hooks.clone();
            self.animator.to(
                bound,
                SETTLE_DURATION_MS,
                ease,
                Rc::clone(&self.hooks.change),
                Box::new(move |value| (hooks.animation_end)(value)),
            );
        } else if self.config.step.is_some() {
            self.correct();
        } else {
            (self.hooks.animation_end)(value);
        }
    }

    /// Snap the property to the nearest step inside the bounds
    pub(crate) fn correct(&self) {
        let Some(step) = self.config.step else {
            return;
        };

        let value = self.animator.binding().get();
        let target = correction_target(value, step, self.config.min, self.config.max);
        tracing::debug!("planner: correcting {} to {}", value, target);

        let planner = self.downgrade();
        self.animator.to(
            target,
            CORRECTION_DURATION_MS,
            ease,
            Rc::clone(&self.hooks.change),
            Box::new(move |value| {
                if let Some(live) = planner.upgrade() {
                    live.update_page();
                }
                (planner.hooks.correction_end)(value);
                (planner.hooks.animation_end)(value);
            }),
        );
    }

    /// Programmatic move
    pub(crate) fn expose_to(&self, value: f64, duration: Option<f64>, easing: Option<EasingFn>) {
        let planner = self.downgrade();
        self.animator.to(
            value,
            duration.unwrap_or(EXPOSE_DURATION_MS),
            easing.unwrap_or(ease),
            Rc::clone(&self.hooks.change),
            Box::new(move |value| {
                if let Some(live) = planner.upgrade() {
                    live.update_page();
                }
                (planner.hooks.rebound_end)(value);
                (planner.hooks.animation_end)(value);
            }),
        );
    }
}

/// [`MotionPlanner`] without ownership of the animator
struct WeakPlanner {
    config: Rc<FlickConfig>,
    hooks: FlickHooks,
    animator: WeakAnimator,
    page: Rc<Cell<Option<i64>>>,
}

impl WeakPlanner {
    fn upgrade(&self) -> Option<MotionPlanner> {
        Some(MotionPlanner {
            config: Rc::clone(&self.config),
            hooks: self.hooks.clone(),
            animator: self.animator.upgrade()?,
            page: Rc::clone(&self.page),
        })
    }
}
