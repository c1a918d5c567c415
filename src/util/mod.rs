//! Shared utilities for the animation core.
//!
//! Easing curves and the seeded generator used for reproducible packing.

pub mod easing;
pub mod rng;
