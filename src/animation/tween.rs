//! Fixed-duration from/to/start-time tweens.

use crate::util::easing::EasingFunction;

/// Eased interpolation between two values over a fixed duration.
///
/// Replaced wholesale whenever a new transition starts; a tween never
/// queues behind another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Value at `start_time`.
    pub from: f32,
    /// Value once `duration` has elapsed.
    pub to: f32,
    /// Time (seconds) the tween began.
    pub start_time: f32,
    /// Length in seconds; zero jumps straight to `to`.
    pub duration: f32,
    /// Curve applied to normalized progress.
    pub easing: EasingFunction,
}

impl Tween {
    /// Tween from `from` to `to` starting at `start_time`.
    #[must_use]
    pub const fn new(
        from: f32,
        to: f32,
        start_time: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
            easing,
        }
    }

    /// A tween that holds `value` forever.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value, 0.0, 0.0, EasingFunction::Linear)
    }

    /// Raw progress in `[0, 1]` at `t`.
    #[must_use]
    pub fn progress(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((t - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Eased value at `t`.
    #[must_use]
    pub fn value(&self, t: f32) -> f32 {
        let eased = self.easing.evaluate(self.progress(t));
        self.from + (self.to - self.from) * eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_midpoint() {
        let tween = Tween::new(0.0, 1.0, 2.0, 0.5, EasingFunction::SineInOut);
        assert_eq!(tween.value(1.0), 0.0);
        assert!(tween.value(2.0).abs() < 1e-6);
        assert!((tween.value(2.25) - 0.5).abs() < 1e-5);
        assert!((tween.value(2.5) - 1.0).abs() < 1e-6);
        assert_eq!(tween.progress(2.5), 1.0);
        assert!(tween.progress(2.4) < 1.0);
    }

    #[test]
    fn test_fixed_holds() {
        let tween = Tween::fixed(0.3);
        assert_eq!(tween.value(-10.0), 0.3);
        assert_eq!(tween.value(99.0), 0.3);
        assert_eq!(tween.progress(0.0), 1.0);
    }

    #[test]
    fn test_progress_clamps_outside_the_window() {
        let tween = Tween::new(0.0, 1.0, 1.0, 2.0, EasingFunction::Linear);
        assert_eq!(tween.progress(0.0), 0.0);
        assert!((tween.progress(2.0) - 0.5).abs() < 1e-6);
        assert_eq!(tween.progress(9.0), 1.0);
    }
}
