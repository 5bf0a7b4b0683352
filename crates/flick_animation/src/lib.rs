//! Flick Animation Engine
//!
//! Drives a single numeric property from its current value toward a
//! destination, one sample per animation frame.
//!
//! # Features
//!
//! - **Easing pair**: circular ease-out and its exact inverse
//! - **Frame scheduling**: injected `request_frame`/`cancel_frame` primitive
//!   with a host-driven frame loop and a 16ms timer fallback
//! - **Bound properties**: get/set access to one named slot on an opaque target
//! - **Animator**: cancellable tweens with change/complete callbacks
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use flick_animation::*;
//!
//! let clock = ManualClock::new();
//! let frames = Rc::new(FrameLoop::new(clock.clone()));
//! let target = Rc::new(PropertyBag::new());
//! let binding = PropertyBinding::new(target, "translateY");
//!
//! let animator = Animator::new(binding.clone(), frames.clone(), false);
//! animator.to(100.0, 200.0, easing::ease, Rc::new(|_| {}), Box::new(|_| {}));
//!
//! frames.run_frames(20, 16.0);
//! assert_eq!(binding.get(), 100.0);
//! ```

pub mod animator;
pub mod easing;
pub mod frame;
pub mod property;

pub use animator::{Animator, ChangeCallback, CompleteCallback, WeakAnimator};
pub use easing::EasingFn;
pub use frame::{
    select_scheduler, Clock, FrameCallback, FrameHandle, FrameLoop, FrameScheduler, ManualClock,
    SystemClock, TimerScheduler, FALLBACK_FRAME_INTERVAL_MS,
};
pub use property::{PropertyBag, PropertyBinding, PropertyTarget};
