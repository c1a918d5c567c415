//! Time-driven building blocks for the bubble animation.
//!
//! Every type here is a pure function of time in seconds: springs, tweens,
//! circle size transitions and the size oscillation never read a clock.
//! The [`deferred`] queue holds follow-ups that the bubble fires from its
//! frame tick.

pub mod circle_transition;
pub mod deferred;
pub mod oscillation;
pub mod spring;
pub mod tween;

pub use circle_transition::{CircleSizeTracker, CircleTransition, SizedCircle};
pub use deferred::{CancelToken, DeferredQueue};
pub use oscillation::{renormalize, CirclePhase, OscillationProfile};
pub use spring::{Spring, SpringParams, SpringTrack};
pub use tween::Tween;
