//! Callback hooks
//!
//! Every hook is optional. Unset slots hold a no-op, so the gesture code
//! calls each one unconditionally.

use std::fmt;
use std::rc::Rc;

use flick_platform::TouchEvent;

/// Hook receiving the property value
pub type ValueHook = Rc<dyn Fn(f64)>;

/// Hook receiving the triggering event and the property value
pub type EventHook = Rc<dyn Fn(&TouchEvent, f64)>;

/// Hook run on release with the event, the value and the page index
pub type TouchEndHook = Rc<dyn Fn(&TouchEvent, f64, Option<i64>) -> ReleaseFlow>;

/// What the release handler does after the touch-end hook returns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleaseFlow {
    /// Run the rebound / inertia / correction decision
    #[default]
    Continue,
    /// Skip it; the property stays where the finger left it
    Abort,
}

/// Registry of user callbacks
#[derive(Clone)]
pub struct FlickHooks {
    pub(crate) change: ValueHook,
    pub(crate) touch_start: EventHook,
    pub(crate) touch_move: EventHook,
    pub(crate) touch_end: TouchEndHook,
    pub(crate) touch_cancel: EventHook,
    pub(crate) tap: EventHook,
    pub(crate) press_move: EventHook,
    pub(crate) rebound_end: ValueHook,
    pub(crate) animation_end: ValueHook,
    pub(crate) correction_end: ValueHook,
}

impl Default for FlickHooks {
    fn default() -> Self {
        let value: ValueHook = Rc::new(|_| {});
        let event: EventHook = Rc::new(|_, _| {});
        Self {
            change: Rc::clone(&value),
            touch_start: Rc::clone(&event),
            touch_move: Rc::clone(&event),
            touch_end: Rc::new(|_, _, _| ReleaseFlow::Continue),
            touch_cancel: Rc::clone(&event),
            tap: Rc::clone(&event),
            press_move: event,
            rebound_end: Rc::clone(&value),
            animation_end: Rc::clone(&value),
            correction_end: value,
        }
    }
}

impl FlickHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write of the property, from dragging or animation
    pub fn on_change<F: Fn(f64) + 'static>(mut self, f: F) -> Self {
        self.change = Rc::new(f);
        self
    }

    pub fn on_touch_start<F: Fn(&TouchEvent, f64) + 'static>(mut self, f: F) -> Self {
        self.touch_start = Rc::new(f);
        self
    }

    /// Drag moves that changed the property
    pub fn on_touch_move<F: Fn(&TouchEvent, f64) + 'static>(mut self, f: F) -> Self {
        self.touch_move = Rc::new(f);
        self
    }

    /// Release; return [`ReleaseFlow::Abort`] to skip the release animation
    pub fn on_touch_end<F>(mut self, f: F) -> Self
    where
        F: Fn(&TouchEvent, f64, Option<i64>) -> ReleaseFlow + 'static,
    {
        self.touch_end = Rc::new(f);
        self
    }

    pub fn on_touch_cancel<F: Fn(&TouchEvent, f64) + 'static>(mut self, f: F) -> Self {
        self.touch_cancel = Rc::new(f);
        self
    }

    pub fn on_tap<F: Fn(&TouchEvent, f64) + 'static>(mut self, f: F) -> Self {
        self.tap = Rc::new(f);
        self
    }

    /// Single-finger moves; the event carries `delta_x`/`delta_y`
    pub fn on_press_move<F: Fn(&TouchEvent, f64) + 'static>(mut self, f: F) -> Self {
        self.press_move = Rc::new(f);
        self
    }

    pub fn on_rebound_end<F: Fn(f64) + 'static>(mut self, f: F) -> Self {
        self.rebound_end = Rc::new(f);
        self
    }

    /// Any release or programmatic animation came to rest
    pub fn on_animation_end<F: Fn(f64) + 'static>(mut self, f: F) -> Self {
        self.animation_end = Rc::new(f);
        self
    }

    pub fn on_correction_end<F: Fn(f64) + 'static>(mut self, f: F) -> Self {
        self.correction_end = Rc::new(f);
        self
    }
}

impl fmt::Debug for FlickHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlickHooks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_defaults_are_callable() {
        let hooks = FlickHooks::default();
        let event = TouchEvent::end(0.0, 0.0);
        (hooks.change)(1.0);
        (hooks.tap)(&event, 1.0);
        assert_eq!((hooks.touch_end)(&event, 1.0, None), ReleaseFlow::Continue);
    }

    #[test]
    fn test_override_one_slot() {
        let hits = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&hits);
        let hooks = FlickHooks::new().on_change(move |v| sink.set(v));

        (hooks.change)(42.0);
        (hooks.animation_end)(7.0);
        assert_eq!(hits.get(), 42.0);
    }
}
