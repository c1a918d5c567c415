//! Closed-form damped harmonic oscillator interpolation.
//!
//! A [`Spring`] eases a scalar from a start value to an end value the way a
//! damped spring would, parameterized by damping ratio and response time
//! (`ω₀ = 2π / response`). Springs are immutable; retargeting builds a new
//! spring seeded with the old one's current value and velocity so rapid
//! target changes never pop.

use std::f32::consts::TAU;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Step used for finite-difference velocity sampling.
pub const VELOCITY_SAMPLE_STEP: f32 = 1.0 / 60.0;

/// Damping ratios within this of 1.0 use the critically damped form.
const CRITICAL_BAND: f32 = 1e-4;
/// Floor on the response time to keep ω₀ finite.
const MIN_RESPONSE: f32 = 1e-3;
/// Targets closer than this to the tracked one are not retargeted.
const RETARGET_TOLERANCE: f32 = 1e-3;

/// Shape of a spring.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct SpringParams {
    /// Damping ratio ζ. Below 1.0 overshoots, 1.0 is critical, above is
    /// sluggish.
    pub damping_ratio: f32,
    /// Response time in seconds (period of the undamped oscillation).
    pub response: f32,
}

impl SpringParams {
    /// Params from damping ratio and response time.
    #[must_use]
    pub const fn new(damping_ratio: f32, response: f32) -> Self {
        Self {
            damping_ratio,
            response,
        }
    }

    /// Undamped angular frequency ω₀.
    #[must_use]
    pub fn angular_frequency(&self) -> f32 {
        TAU / self.response.max(MIN_RESPONSE)
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::new(0.75, 0.45)
    }
}

/// One spring-driven transition of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Value at `start_time`.
    pub start_value: f32,
    /// Value the spring settles at.
    pub end_value: f32,
    /// Time (seconds) the transition began.
    pub start_time: f32,
    /// Velocity (units per second) at `start_time`.
    pub initial_velocity: f32,
    /// Damping ratio and response.
    pub params: SpringParams,
    /// Elapsed time after which the spring reports `end_value` exactly.
    pub cutoff: f32,
}

impl Spring {
    /// Spring from explicit start/end state.
    #[must_use]
    pub const fn new(
        start_value: f32,
        end_value: f32,
        start_time: f32,
        initial_velocity: f32,
        params: SpringParams,
        cutoff: f32,
    ) -> Self {
        Self {
            start_value,
            end_value,
            start_time,
            initial_velocity,
            params,
            cutoff,
        }
    }

    /// A spring already at rest at `value`.
    #[must_use]
    pub fn at_rest(value: f32) -> Self {
        Self::new(value, value, 0.0, 0.0, SpringParams::default(), 0.0)
    }

    /// Value at time `t`.
    #[must_use]
    pub fn value(&self, t: f32) -> f32 {
        let elapsed = t - self.start_time;
        if elapsed <= 0.0 {
            return self.start_value;
        }
        if elapsed >= self.cutoff {
            return self.end_value;
        }
        self.end_value + self.displacement(elapsed)
    }

    /// Velocity at time `t`, by central finite difference over
    /// [`VELOCITY_SAMPLE_STEP`]. Zero once the cutoff has passed.
    #[must_use]
    pub fn velocity(&self, t: f32) -> f32 {
        let elapsed = t - self.start_time;
        if elapsed >= self.cutoff {
            return 0.0;
        }
        let h = VELOCITY_SAMPLE_STEP;
        // The closed form is smooth through t = 0, so sampling just before
        // the start is still exact.
        let ahead = self.displacement(elapsed + 0.5 * h);
        let behind = self.displacement(elapsed - 0.5 * h);
        (ahead - behind) / h
    }

    /// Whether the cutoff has passed at time `t`.
    #[must_use]
    pub fn is_settled(&self, t: f32) -> bool {
        t - self.start_time >= self.cutoff
    }

    /// New spring heading for `end_value`, continuing from this spring's
    /// value and velocity at time `t`. `extra_velocity` is added on top.
    #[must_use]
    pub fn retarget(
        &self,
        t: f32,
        end_value: f32,
        extra_velocity: f32,
        params: SpringParams,
        cutoff: f32,
    ) -> Self {
        Self::new(
            self.value(t),
            end_value,
            t,
            self.velocity(t) + extra_velocity,
            params,
            cutoff,
        )
    }

    /// Offset from `end_value` after `t` seconds, unclamped.
    fn displacement(&self, t: f32) -> f32 {
        let x0 = self.start_value - self.end_value;
        let v0 = self.initial_velocity;
        let omega = self.params.angular_frequency();
        let zeta = self.params.damping_ratio.max(0.0);

        if zeta < 1.0 - CRITICAL_BAND {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let b = (v0 + zeta * omega * x0) / damped;
            let decay = (-zeta * omega * t).exp();
            decay * (x0 * (damped * t).cos() + b * (damped * t).sin())
        } else if zeta > 1.0 + CRITICAL_BAND {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        } else {
            (x0 + (v0 + omega * x0) * t) * (-omega * t).exp()
        }
    }
}

/// A spring-animated scalar that only retargets when its target changes.
///
/// The comparison is against the tracked target, not the displayed value,
/// so calling [`set_target`](Self::set_target) every frame with the same
/// target does not restart the spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTrack {
    spring: Spring,
    target: f32,
}

impl SpringTrack {
    /// Track resting at `value`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            spring: Spring::at_rest(value),
            target: value,
        }
    }

    /// Current target.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Displayed value at `t`.
    #[must_use]
    pub fn value(&self, t: f32) -> f32 {
        self.spring.value(t)
    }

    /// The active spring.
    #[must_use]
    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Head for `target`, adding `velocity_boost · (target − current)` to
    /// the carried-over velocity. Returns whether a new spring started.
    pub fn set_target(
        &mut self,
        t: f32,
        target: f32,
        params: SpringParams,
        cutoff: f32,
        velocity_boost: f32,
    ) -> bool {
        if (target - self.target).abs() <= RETARGET_TOLERANCE {
            return false;
        }
        let boost = (target - self.spring.value(t)) * velocity_boost;
        self.spring = self.spring.retarget(t, target, boost, params, cutoff);
        self.target = target;
        true
    }

    /// Jump to `value` with no animation.
    pub fn snap(&mut self, value: f32) {
        self.spring = Spring::at_rest(value);
        self.target = value;
    }
}
