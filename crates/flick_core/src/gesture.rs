//! Gesture tracking state
//!
//! A gesture is either absent ([`GestureState::Idle`]) or in progress
//! ([`GestureState::Dragging`]), in which case it owns a [`GestureSession`].
//! Session data only exists between touch start and touch end, so a move or
//! end without a start has nothing to act on.

use crate::config::{Axis, FlickConfig};

/// Movement below this on both axes is ignored
pub const DEAD_ZONE: f64 = 10.0;

/// Releases closer than this to the start point on both axes are taps
pub const TAP_SLOP: f64 = 30.0;

/// Drag speed is measured over at most this window, and releases after a
/// longer still window get no inertia
pub const SPEED_WINDOW_MS: f64 = 300.0;

/// Tracker state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    /// No finger down
    #[default]
    Idle,
    /// A finger is down and being tracked
    Dragging(GestureSession),
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging(_))
    }
}

/// Outcome of the direction check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionLock {
    /// No move seen yet
    Pending,
    /// Dragging along the tracked axis
    Tracking,
    /// The gesture started along the other axis; it never drags
    LockedOut,
}

/// Per-gesture data
#[derive(Clone, Debug, PartialEq)]
pub struct GestureSession {
    axis: Axis,
    start_x: f64,
    start_y: f64,
    prev_x: f64,
    prev_y: f64,
    /// Speed reference point, refreshed every [`SPEED_WINDOW_MS`]
    anchor_time: f64,
    anchor_position: f64,
    direction: DirectionLock,
    /// Last move position reported to the press-move hook
    last_sample: Option<(f64, f64)>,
}

impl GestureSession {
    /// Open a session at the touch-start point
    pub fn begin(x: f64, y: f64, axis: Axis, now: f64) -> Self {
        Self {
            axis,
            start_x: x,
            start_y: y,
            prev_x: x,
            prev_y: y,
            anchor_time: now,
            anchor_position: axis.pick(x, y),
            direction: DirectionLock::Pending,
            last_sample: None,
        }
    }

    pub fn direction(&self) -> DirectionLock {
        self.direction
    }

    pub fn is_locked_out(&self) -> bool {
        self.direction == DirectionLock::LockedOut
    }

    pub fn anchor_time(&self) -> f64 {
        self.anchor_time
    }

    pub fn anchor_position(&self) -> f64 {
        self.anchor_position
    }

    /// Most recent point seen by this session
    pub fn last_point(&self) -> (f64, f64) {
        self.last_sample.unwrap_or((self.prev_x, self.prev_y))
    }

    /// Absolute displacement from the start point
    pub fn displacement(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.start_x).abs(), (y - self.start_y).abs())
    }

    /// Record a move: decides the direction lock on the first one and
    /// returns the displacement from the start point
    pub fn observe_move(&mut self, x: f64, y: f64, lock_direction: bool) -> (f64, f64) {
        let (dx, dy) = self.displacement(x, y);

        if self.direction == DirectionLock::Pending {
            let across = match self.axis {
                Axis::Vertical => dx > dy,
                Axis::Horizontal => dx < dy,
            };
            self.direction = if lock_direction && across {
                tracing::debug!("gesture: direction locked out (dx={}, dy={})", dx, dy);
                DirectionLock::LockedOut
            } else {
                DirectionLock::Tracking
            };
        }

        (dx, dy)
    }

    /// Tracked-axis movement since the previous drag sample
    pub fn take_drag_delta(&mut self, x: f64, y: f64) -> f64 {
        let delta = self.axis.pick(x - self.prev_x, y - self.prev_y);
        self.prev_x = x;
        self.prev_y = y;
        delta
    }

    /// Move the speed anchor to the latest sample once it is too old
    pub fn reanchor_if_stale(&mut self, now: f64) {
        if now - self.anchor_time > SPEED_WINDOW_MS {
            self.anchor_time = now;
            self.anchor_position = self.axis.pick(self.prev_x, self.prev_y);
        }
    }

    /// Movement since the previous press-move sample (zero for the first)
    pub fn take_press_delta(&mut self, x: f64, y: f64) -> (f64, f64) {
        let delta = match self.last_sample {
            Some((last_x, last_y)) => (x - last_x, y - last_y),
            None => (0.0, 0.0),
        };
        self.last_sample = Some((x, y));
        delta
    }

    /// Whether a release at (x, y) counts as a tap
    pub fn is_tap(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = self.displacement(x, y);
        dx < TAP_SLOP && dy < TAP_SLOP
    }
}

/// Whether a displacement stays inside the dead zone
pub fn in_dead_zone(dx: f64, dy: f64) -> bool {
    dx < DEAD_ZONE && dy < DEAD_ZONE
}

/// Damping for a drag of `delta` while the property is at `current`
///
/// Pushing further past a bound uses the stiffer out-of-bounds factor.
pub fn drag_factor(config: &FlickConfig, current: f64, delta: f64) -> f64 {
    let past_max = config.max.is_some_and(|max| current > max && delta > 0.0);
    let past_min = config.min.is_some_and(|min| current < min && delta < 0.0);
    if past_max || past_min {
        config.out_factor
    } else {
        config.move_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_lock_out_on_horizontal_start() {
        let mut session = GestureSession::begin(0.0, 0.0, Axis::Vertical, 0.0);
        session.observe_move(30.0, 5.0, true);
        assert!(session.is_locked_out());

        // Later moves never unlock
        session.observe_move(30.0, 300.0, true);
        assert!(session.is_locked_out());
    }

    #[test]
    fn test_horizontal_lock_out_on_vertical_start() {
        let mut session = GestureSession::begin(0.0, 0.0, Axis::Horizontal, 0.0);
        session.observe_move(2.0, 20.0, true);
        assert_eq!(session.direction(), DirectionLock::LockedOut);
    }

    #[test]
    fn test_no_lock_when_disabled() {
        let mut session = GestureSession::begin(0.0, 0.0, Axis::Vertical, 0.0);
        session.observe_move(30.0, 5.0, false);
        assert_eq!(session.direction(), DirectionLock::Tracking);
    }

    #[test]
    fn test_lock_decided_even_inside_dead_zone() {
        let mut session = GestureSession::begin(0.0, 0.0, Axis::Vertical, 0.0);
        let (dx, dy) = session.observe_move(3.0, 1.0, true);
        assert!(in_dead_zone(dx, dy));
        assert!(session.is_locked_out());
    }

    #[test]
    fn test_drag_delta_follows_previous_sample() {
        let mut session = GestureSession::begin(0.0, 100.0, Axis::Vertical, 0.0);
        assert_eq!(session.take_drag_delta(0.0, 120.0), 20.0);
        assert_eq!(session.take_drag_delta(5.0, 110.0), -10.0);
    }

    #[test]
    fn test_reanchor_after_window() {
        let mut session = GestureSession::begin(0.0, 0.0, Axis::Vertical, 1000.0);
        session.take_drag_delta(0.0, 50.0);
        session.reanchor_if_stale(1300.0);
        assert_eq!(session.anchor_time(), 1000.0);

        session.take_drag_delta(0.0, 80.0);
        session.reanchor_if_stale(1301.0);
        assert_eq!(session.anchor_time(), 1301.0);
        assert_eq!(session.anchor_position(), 80.0);
    }

    #[test]
    fn test_press_delta() {
        let mut session = GestureSession::begin(0.0, 0.0, Axis::Vertical, 0.0);
        assert_eq!(session.take_press_delta(10.0, 20.0), (0.0, 0.0));
        assert_eq!(session.take_press_delta(13.0, 15.0), (3.0, -5.0));
        assert_eq!(session.last_point(), (13.0, 15.0));
    }

    #[test]
    fn test_tap_detection() {
        let session = GestureSession::begin(100.0, 200.0, Axis::Vertical, 0.0);
        assert!(session.is_tap(110.0, 205.0));
        assert!(!session.is_tap(100.0, 230.0));
    }

    #[test]
    fn test_drag_factor() {
        let config = FlickConfig::new("y").bounds(0.0, 100.0).move_factor(0.9);
        assert_eq!(drag_factor(&config, 150.0, 5.0), 0.3);
        assert_eq!(drag_factor(&config, 150.0, -5.0), 0.9);
        assert_eq!(drag_factor(&config, -10.0, -5.0), 0.3);
        assert_eq!(drag_factor(&config, 50.0, 5.0), 0.9);

        let unbounded = FlickConfig::new("y");
        assert_eq!(drag_factor(&unbounded, 1e6, 5.0), 1.0);
    }
}
