//! Flick Platform Surface
//!
//! Host-facing types consumed by the gesture core:
//!
//! - [`TouchEvent`] / [`TouchPoint`] - the pointer-like event object the host
//!   feeds in (active touches, changed touches, target tag)
//! - [`TouchDispatcher`] - subscribe/unsubscribe binding of touch handlers to
//!   an element or to the window
//! - [`HostCapabilities`] - detect CSS transform support
//!
//! # Example
//!
//! ```rust
//! use flick_platform::*;
//!
//! let window = TouchDispatcher::new();
//! let id = window.subscribe(TouchPhase::Move, |event| {
//!     event.prevent_default();
//! });
//!
//! let mut event = TouchEvent::moved(10.0, 20.0);
//! window.dispatch(&mut event);
//! assert!(event.default_prevented());
//!
//! window.unsubscribe(id);
//! ```

mod capabilities;
mod dispatch;
mod input;

pub use capabilities::{HostCapabilities, TransformSupport};
pub use dispatch::{ListenerId, TouchDispatcher, TouchHandler};
pub use input::{TouchEvent, TouchList, TouchPhase, TouchPoint};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capabilities::{HostCapabilities, TransformSupport};
    pub use crate::dispatch::{ListenerId, TouchDispatcher};
    pub use crate::input::{TouchEvent, TouchPhase, TouchPoint};
}
