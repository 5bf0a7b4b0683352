//! Easing functions
//!
//! Map normalized time in [0, 1] to normalized progress in [0, 1].
//! The motion planner also needs the inverse curve to turn a distance ratio
//! back into a time ratio, so the pair is kept together here.

/// Easing function type
pub type EasingFn = fn(f64) -> f64;

/// Constant speed
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Circular ease-out: fast start, gentle stop
#[inline]
pub fn ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (1.0 - (t - 1.0).powi(2)).sqrt()
}

/// Inverse of [`ease`]: which time fraction reaches progress `y`
#[inline]
pub fn reverse_ease(y: f64) -> f64 {
    let y = y.clamp(0.0, 1.0);
    1.0 - (1.0 - y * y).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_bounds() {
        let easings: &[EasingFn] = &[linear, ease, reverse_ease];
        for easing in easings {
            assert!((easing(0.0) - 0.0).abs() < 1e-12);
            assert!((easing(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let value = ease(i as f64 / 100.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn test_reverse_ease_inverts_ease() {
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!((reverse_ease(ease(t)) - t).abs() < 1e-9, "t = {}", t);
        }
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        assert_eq!(ease(1.5), 1.0);
        assert_eq!(reverse_ease(1.0000001), 1.0);
        assert!(!reverse_ease(-0.2).is_nan());
    }
}
