//! Touch event types
//!
//! Mirrors the shape of a browser `TouchEvent`: the list of touches still on
//! the surface, the list of touches that changed in this event, and the tag
//! name of the element the event was dispatched to.

use smallvec::SmallVec;

/// Touch lists rarely hold more than two points
pub type TouchList = SmallVec<[TouchPoint; 2]>;

/// Lifecycle phase of a touch event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A finger touched the surface
    Start,
    /// A finger moved
    Move,
    /// A finger was lifted
    End,
    /// The system cancelled the touch (e.g., by a system gesture)
    Cancel,
}

/// A single touch point in page coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Unique identifier for this touch
    pub id: u64,
    /// X position in page coordinates
    pub page_x: f64,
    /// Y position in page coordinates
    pub page_y: f64,
}

impl TouchPoint {
    pub fn new(id: u64, page_x: f64, page_y: f64) -> Self {
        Self { id, page_x, page_y }
    }
}

// ============================================================================
// Touch Events
// ============================================================================

/// A touch event as delivered by the host
#[derive(Clone, Debug)]
pub struct TouchEvent {
    /// Which lifecycle phase this event belongs to
    pub phase: TouchPhase,
    /// Touches currently on the surface
    pub touches: TouchList,
    /// Touches that changed in this event (the lifted finger for `End`)
    pub changed_touches: TouchList,
    /// Upper-case tag name of the event target, if any (e.g. `"INPUT"`)
    pub target_tag: Option<String>,
    /// Horizontal movement since the previous move event of this gesture
    ///
    /// Filled in by the gesture tracker before the press-move hook runs.
    pub delta_x: f64,
    /// Vertical movement since the previous move event of this gesture
    pub delta_y: f64,
    default_prevented: bool,
}

impl TouchEvent {
    /// Create an event with explicit touch lists
    pub fn new(phase: TouchPhase, touches: TouchList, changed_touches: TouchList) -> Self {
        Self {
            phase,
            touches,
            changed_touches,
            target_tag: None,
            delta_x: 0.0,
            delta_y: 0.0,
            default_prevented: false,
        }
    }

    /// Single-finger touch start at (x, y)
    pub fn start(x: f64, y: f64) -> Self {
        let point = TouchPoint::new(0, x, y);
        Self::new(
            TouchPhase::Start,
            smallvec::smallvec![point],
            smallvec::smallvec![point],
        )
    }

    /// Single-finger move to (x, y)
    pub fn moved(x: f64, y: f64) -> Self {
        let point = TouchPoint::new(0, x, y);
        Self::new(
            TouchPhase::Move,
            smallvec::smallvec![point],
            smallvec::smallvec![point],
        )
    }

    /// Finger lifted at (x, y); no touches remain on the surface
    pub fn end(x: f64, y: f64) -> Self {
        let point = TouchPoint::new(0, x, y);
        Self::new(TouchPhase::End, TouchList::new(), smallvec::smallvec![point])
    }

    /// Touch cancelled at (x, y)
    pub fn cancel(x: f64, y: f64) -> Self {
        let point = TouchPoint::new(0, x, y);
        Self::new(
            TouchPhase::Cancel,
            TouchList::new(),
            smallvec::smallvec![point],
        )
    }

    /// Set the target element tag
    pub fn with_target_tag(mut self, tag: impl Into<String>) -> Self {
        self.target_tag = Some(tag.into());
        self
    }

    /// Add another active touch point
    pub fn with_touch(mut self, point: TouchPoint) -> Self {
        self.touches.push(point);
        self
    }

    /// The first active touch point
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// The first changed touch point
    pub fn primary_changed_touch(&self) -> Option<&TouchPoint> {
        self.changed_touches.first()
    }

    /// Suppress the host's default action for this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether `prevent_default` was called
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_event_has_changed_touch_only() {
        let event = TouchEvent::end(110.0, 205.0);
        assert!(event.primary_touch().is_none());
        let changed = event.primary_changed_touch().unwrap();
        assert_eq!((changed.page_x, changed.page_y), (110.0, 205.0));
    }

    #[test]
    fn test_prevent_default() {
        let mut event = TouchEvent::moved(0.0, 0.0).with_target_tag("DIV");
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
        assert_eq!(event.target_tag.as_deref(), Some("DIV"));
    }

    #[test]
    fn test_multi_touch() {
        let event = TouchEvent::moved(0.0, 0.0).with_touch(TouchPoint::new(1, 5.0, 5.0));
        assert_eq!(event.touches.len(), 2);
    }
}
