//! Flick Gesture Core
//!
//! Single-finger touch tracking bound to one numeric property, with the
//! physics of a native scroll view:
//!
//! - **Drag following** with sensitivity and damping
//! - **Boundary resistance** while dragging past `min`/`max`
//! - **Inertia**: constant-deceleration coasting after a quick release
//! - **Rebound** into the bounds, through an elastic spring region
//! - **Step correction**: snap the resting value to a multiple of `step`
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use flick_animation::{FrameLoop, ManualClock, PropertyBag};
//! use flick_core::{Flick, FlickConfig, FlickHooks};
//! use flick_platform::TouchEvent;
//!
//! let clock = ManualClock::new();
//! let frames = Rc::new(FrameLoop::new(clock.clone()));
//! let target = Rc::new(PropertyBag::new().with("translateY", 0.0));
//!
//! let flick = Flick::builder(
//!     FlickConfig::new("translateY").bounds(0.0, 500.0).step(100.0).inertia(false),
//!     target,
//! )
//! .scheduler(frames.clone())
//! .hooks(FlickHooks::new().on_animation_end(|v| println!("rest at {v}")))
//! .build()
//! .unwrap();
//!
//! flick.on_touch_start(&mut TouchEvent::start(0.0, 0.0));
//! flick.on_touch_move(&mut TouchEvent::moved(0.0, 160.0));
//! flick.on_touch_end(&mut TouchEvent::end(0.0, 160.0));
//!
//! frames.run_until_idle(16.0, 100);
//! assert_eq!(flick.value(), 200.0);
//! assert_eq!(flick.current_page(), Some(3));
//! ```

pub mod config;
pub mod error;
pub mod flick;
pub mod gesture;
pub mod hooks;
pub mod planner;

pub use config::{Axis, FlickConfig};
pub use error::{FlickError, Result};
pub use flick::{Flick, FlickBuilder};
pub use gesture::{DirectionLock, GestureSession, GestureState};
pub use hooks::{FlickHooks, ReleaseFlow};
pub use planner::{
    correction_target, page_index, plan_release, project_inertia, InertiaPlan, ReleaseInput,
    ReleasePlan,
};
