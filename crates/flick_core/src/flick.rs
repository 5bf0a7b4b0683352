//! The public facade
//!
//! [`Flick`] binds one property of a target to single-finger touch input.
//! Touch handlers update the property directly while dragging; on release
//! the motion planner hands continuous motion to the animator.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use flick_animation::{
    select_scheduler, Animator, EasingFn, FrameScheduler, PropertyBinding, PropertyTarget,
};
use flick_platform::{HostCapabilities, ListenerId, TouchDispatcher, TouchEvent, TouchPhase};
use regex::Regex;

use crate::config::FlickConfig;
use crate::error::{FlickError, Result};
use crate::gesture::{drag_factor, in_dead_zone, GestureSession, GestureState};
use crate::hooks::{FlickHooks, ReleaseFlow};
use crate::planner::{MotionPlanner, ReleaseInput};

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Flick`]
pub struct FlickBuilder {
    config: FlickConfig,
    target: Rc<dyn PropertyTarget>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    hooks: FlickHooks,
    capabilities: HostCapabilities,
}

impl FlickBuilder {
    /// Frame scheduler offered by the platform. Without one, a 16ms timer
    /// fallback is used and the host drives it with [`Flick::tick`].
    pub fn scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn hooks(mut self, hooks: FlickHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Validate the configuration and bind the property
    ///
    /// Writes the initial value (or the property's current value) back to
    /// the target.
    pub fn build(self) -> Result<Flick> {
        if !self.capabilities.transform.is_supported() {
            return Err(FlickError::TransformUnsupported);
        }
        self.config.validate()?;
        let exception = self.config.exception_pattern()?;

        let binding = PropertyBinding::new(self.target, &self.config.property);
        let initial = match self.config.initial_value {
            Some(value) => value,
            None if binding.exists() => binding.get(),
            None => return Err(FlickError::MissingProperty(self.config.property.clone())),
        };
        binding.set(initial);

        let scheduler = select_scheduler(self.scheduler);
        let config = Rc::new(self.config);
        let animator = Animator::new(binding.clone(), scheduler, config.fixed);
        let planner = MotionPlanner::new(Rc::clone(&config), self.hooks.clone(), animator.clone());

        tracing::debug!(
            "Flick: bound '{}' = {} ({:?} axis, min={:?}, max={:?}, step={:?})",
            config.property,
            initial,
            config.axis(),
            config.min,
            config.max,
            config.step
        );

        Ok(Flick {
            inner: Rc::new(FlickInner {
                config,
                hooks: self.hooks,
                binding,
                animator,
                planner,
                exception,
                capabilities: self.capabilities,
                gesture: RefCell::new(GestureState::Idle),
                listeners: RefCell::new(Vec::new()),
            }),
        })
    }
}

// ============================================================================
// Flick
// ============================================================================

struct FlickInner {
    config: Rc<FlickConfig>,
    hooks: FlickHooks,
    binding: PropertyBinding,
    animator: Animator,
    planner: MotionPlanner,
    exception: Regex,
    capabilities: HostCapabilities,
    gesture: RefCell<GestureState>,
    listeners: RefCell<Vec<(Weak<TouchDispatcher>, ListenerId)>>,
}

/// Drag/flick motion bound to one property
///
/// Feed it touch events directly through the `on_touch_*` methods, or let it
/// subscribe itself with [`bind`](Flick::bind).
pub struct Flick {
    inner: Rc<FlickInner>,
}

impl Flick {
    /// Start building a Flick over `config.property` on `target`
    pub fn builder(config: FlickConfig, target: Rc<dyn PropertyTarget>) -> FlickBuilder {
        FlickBuilder {
            config,
            target,
            scheduler: None,
            hooks: FlickHooks::default(),
            capabilities: HostCapabilities::default(),
        }
    }

    pub fn config(&self) -> &FlickConfig {
        &self.inner.config
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.inner.capabilities
    }

    /// Current property value
    pub fn value(&self) -> f64 {
        self.inner.binding.get()
    }

    /// Page index, when min, max and step are all configured
    pub fn current_page(&self) -> Option<i64> {
        self.inner.planner.current_page()
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.gesture.borrow().is_dragging()
    }

    /// Whether a release or programmatic animation is running
    pub fn is_animating(&self) -> bool {
        self.inner.animator.is_running()
    }

    /// The frame scheduler animations run on: the one passed to the
    /// builder, or the timer fallback
    pub fn scheduler(&self) -> &Rc<dyn FrameScheduler> {
        self.inner.animator.scheduler()
    }

    /// Run the animation frames that are due. Hosts that built without a
    /// platform scheduler call this from their main loop.
    pub fn tick(&self) -> usize {
        self.scheduler().pump()
    }

    pub fn on_touch_start(&self, event: &mut TouchEvent) {
        self.inner.touch_start(event);
    }

    pub fn on_touch_move(&self, event: &mut TouchEvent) {
        self.inner.touch_move(event);
    }

    pub fn on_touch_end(&self, event: &mut TouchEvent) {
        self.inner.touch_end(event);
    }

    pub fn on_touch_cancel(&self, event: &mut TouchEvent) {
        self.inner.touch_cancel(event);
    }

    /// Halt any animation and refresh the page index
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Animate to `value` (default 600ms with the standard ease), then fire
    /// the rebound-end and animation-end hooks
    pub fn expose_to(&self, value: f64, duration: Option<f64>, easing: Option<EasingFn>) {
        self.inner.planner.expose_to(value, duration, easing);
    }

    /// Subscribe touch start on `element` and move/end/cancel on `window`
    pub fn bind(&self, element: &Rc<TouchDispatcher>, window: &Rc<TouchDispatcher>) {
        let bindings: [(&Rc<TouchDispatcher>, TouchPhase); 4] = [
            (element, TouchPhase::Start),
            (window, TouchPhase::Move),
            (window, TouchPhase::End),
            (window, TouchPhase::Cancel),
        ];

        let mut listeners = self.inner.listeners.borrow_mut();
        for (dispatcher, phase) in bindings {
            let flick = Rc::downgrade(&self.inner);
            let id = dispatcher.subscribe(phase, move |event| {
                let Some(flick) = flick.upgrade() else {
                    return;
                };
                match event.phase {
                    TouchPhase::Start => flick.touch_start(event),
                    TouchPhase::Move => flick.touch_move(event),
                    TouchPhase::End => flick.touch_end(event),
                    TouchPhase::Cancel => flick.touch_cancel(event),
                }
            });
            listeners.push((Rc::downgrade(dispatcher), id));
        }
    }

    /// Release every event binding and stop animating
    pub fn destroy(&self) {
        self.inner.destroy();
    }
}

impl Drop for Flick {
    fn drop(&mut self) {
        self.inner.destroy();
    }
}

impl fmt::Debug for Flick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flick")
            .field("property", &self.inner.config.property)
            .field("value", &self.value())
            .field("dragging", &self.is_dragging())
            .field("page", &self.current_page())
            .finish()
    }
}

// ============================================================================
// Touch Handling
// ============================================================================

/// Session changes produced by one move event
struct MoveUpdate {
    drag: Option<f64>,
    press: Option<(f64, f64)>,
}

impl FlickInner {
    fn now(&self) -> f64 {
        self.animator.scheduler().now()
    }

    fn touch_start(&self, event: &mut TouchEvent) {
        let Some(point) = event.primary_touch().copied() else {
            tracing::warn!("Flick: touch start without touch points ignored");
            return;
        };

        self.animator.cancel();

        let session =
            GestureSession::begin(point.page_x, point.page_y, self.config.axis(), self.now());
        *self.gesture.borrow_mut() = GestureState::Dragging(session);
        tracing::debug!("Flick: drag started at ({}, {})", point.page_x, point.page_y);

        (self.hooks.touch_start)(event, self.binding.get());
        self.planner.update_page();
    }

    fn touch_move(&self, event: &mut TouchEvent) {
        let Some(point) = event.primary_touch().copied() else {
            tracing::warn!("Flick: touch move without touch points ignored");
            return;
        };
        let (x, y) = (point.page_x, point.page_y);
        let now = self.now();

        let update = {
            let mut state = self.gesture.borrow_mut();
            let GestureState::Dragging(session) = &mut *state else {
                return;
            };

            let (dx, dy) = session.observe_move(x, y, self.config.lock_direction);
            if in_dead_zone(dx, dy) {
                return;
            }

            let drag = if session.is_locked_out() {
                None
            } else {
                let delta = session.take_drag_delta(x, y) * self.config.sensitivity;
                session.reanchor_if_stale(now);
                Some(delta)
            };

            let press_delta = session.take_press_delta(x, y);
            MoveUpdate {
                drag,
                press: (event.touches.len() == 1).then_some(press_delta),
            }
        };

        if let Some(delta) = update.drag {
            let current = self.binding.get();
            let delta = delta * drag_factor(&self.config, current, delta);
            let value = if self.config.fixed {
                current
            } else {
                self.binding.offset(delta)
            };
            tracing::trace!("Flick: drag {} -> {}", delta, value);

            (self.hooks.change)(value);
            (self.hooks.touch_move)(event, value);
        }

        if self.config.prevent_default && !self.is_exempt(event) {
            event.prevent_default();
        }

        if let Some((delta_x, delta_y)) = update.press {
            event.delta_x = delta_x;
            event.delta_y = delta_y;
            (self.hooks.press_move)(event, self.binding.get());
        }
    }

    fn touch_end(&self, event: &mut TouchEvent) {
        let session = match std::mem::take(&mut *self.gesture.borrow_mut()) {
            GestureState::Dragging(session) => session,
            GestureState::Idle => return,
        };

        let (x, y) = match event.primary_changed_touch() {
            Some(point) => (point.page_x, point.page_y),
            None => {
                tracing::warn!("Flick: touch end without changed touches, using last sample");
                session.last_point()
            }
        };

        let current = self.binding.get();
        let tap = session.is_tap(x, y);
        if tap {
            (self.hooks.tap)(event, current);
        }

        let flow = (self.hooks.touch_end)(event, current, self.planner.current_page());
        if flow == ReleaseFlow::Abort {
            tracing::debug!("Flick: release handling aborted by touch-end hook");
            return;
        }

        let input = ReleaseInput {
            current,
            tap,
            locked_out: session.is_locked_out(),
            elapsed: self.now() - session.anchor_time(),
            distance: (self.config.axis().pick(x, y) - session.anchor_position())
                * self.config.sensitivity,
        };
        self.planner.release(&input);
    }

    fn touch_cancel(&self, event: &mut TouchEvent) {
        (self.hooks.touch_cancel)(event, self.binding.get());
        self.touch_end(event);
    }

    fn stop(&self) {
        self.animator.cancel();
        self.planner.update_page();
    }

    fn destroy(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for (dispatcher, id) in listeners {
            if let Some(dispatcher) = dispatcher.upgrade() {
                dispatcher.unsubscribe(id);
            }
        }
        self.animator.cancel();
    }

    /// Targets matching the exception keep their default action
    fn is_exempt(&self, event: &TouchEvent) -> bool {
        event
            .target_tag
            .as_deref()
            .is_some_and(|tag| self.exception.is_match(tag))
    }
}
