//! Easing functions for tween interpolation.
//!
//! Morph progress, opacity fades and circle size transitions all map a raw
//! normalized progress through one of these curves. All functions are
//! branch-light and cheap enough to evaluate per circle per frame.

use std::f32::consts::PI;

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Cosine ease-in-out: `(1 - cos(πt)) / 2`.
    SineInOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First interior control value.
        c1: f32,
        /// Second interior control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Default easing function: CubicHermite with c1=0.33, c2=1.0 for natural
    /// ease-out feel.
    pub const DEFAULT: Self = Self::CubicHermite { c1: 0.33, c2: 1.0 };

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::SineInOut => 0.5 * (1.0 - (PI * t).cos()),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_sine_in_out_is_symmetric() {
        let sine = EasingFunction::SineInOut;
        assert!(sine.evaluate(0.0).abs() < 1e-6);
        assert!((sine.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!((sine.evaluate(1.0) - 1.0).abs() < 1e-6);
        let early = sine.evaluate(0.2);
        let late = sine.evaluate(0.8);
        assert!((early + late - 1.0).abs() < 1e-5);
        assert!(early < 0.2, "ease-in start should lag linear");
    }

    #[test]
    fn test_cubic_hermite_ease_out_shape() {
        let hermite = EasingFunction::DEFAULT;
        assert_eq!(hermite.evaluate(0.0), 0.0);
        assert!((hermite.evaluate(1.0) - 1.0).abs() < 1e-6);
        let result_at_quarter = hermite.evaluate(0.25);
        assert!(
            result_at_quarter > 0.25,
            "Ease-out should have value > 0.25 at t=0.25, got {result_at_quarter}"
        );
    }

    #[test]
    fn test_input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);

        let sine = EasingFunction::SineInOut;
        assert!(sine.evaluate(-3.0).abs() < 1e-6);
        assert!((sine.evaluate(7.0) - 1.0).abs() < 1e-6);
    }
}
