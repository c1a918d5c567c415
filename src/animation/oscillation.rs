//! Breathing size oscillation with exact-sum renormalization.
//!
//! Every circle's diameter swings around its base size on a shared period,
//! with a phase and direction fixed per circle from the bubble seed. The
//! swing would break the train's sum-to-perimeter invariant, so a two-pass
//! renormalization restores it: first by distributing the residual in
//! proportion to each circle's room to grow or shrink, then by clamping to
//! bounds and distributing again. Anything the bounds cannot absorb is
//! spread evenly, so the sum always holds.
//!
//! Circles still growing in from zero are held: they neither swing nor
//! take part in renormalization, and the rest of the train absorbs the
//! residual around them.

use std::f32::consts::TAU;

use rand::Rng;

use super::circle_transition::SizedCircle;
use crate::geometry::DiameterBounds;
use crate::util::rng::Lcg64;

/// Residuals below this are left alone.
const RESIDUAL_EPSILON: f32 = 1e-6;

/// Fixed per-circle oscillation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePhase {
    /// Phase offset in radians.
    pub phase: f32,
    /// +1.0 or -1.0.
    pub direction: f32,
}

/// Lazily generated phases, one per circle index, derived from the seed.
///
/// A circle's phase depends only on the seed and its index, so it survives
/// the train growing or shrinking.
#[derive(Debug, Clone)]
pub struct OscillationProfile {
    seed: u64,
    phases: Vec<CirclePhase>,
}

impl OscillationProfile {
    /// Empty profile for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phases: Vec::new(),
        }
    }

    /// Make sure phases exist for `count` circles.
    pub fn ensure(&mut self, count: usize) {
        while self.phases.len() < count {
            let index = self.phases.len() as u64;
            let mut rng = Lcg64::for_slot(self.seed, index);
            let phase = rng.random::<f32>() * TAU;
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            self.phases.push(CirclePhase { phase, direction });
        }
    }

    /// Oscillate the displayed diameters of `base` at time `t` and
    /// renormalize them to sum to `total`. Appearing circles keep their
    /// displayed value.
    pub fn apply(
        &mut self,
        base: &[SizedCircle],
        t: f32,
        amplitude: f32,
        period: f32,
        bounds: DiameterBounds,
        total: f32,
    ) -> Vec<f32> {
        self.ensure(base.len());
        let cycle = if period > 0.0 { TAU * t / period } else { 0.0 };

        let held: Vec<bool> = base.iter().map(|c| c.is_appearing).collect();
        let mut diameters: Vec<f32> = base
            .iter()
            .zip(&self.phases)
            .map(|(c, p)| {
                let b = c.diameter;
                if c.is_appearing {
                    return b;
                }
                let swing = amplitude * (cycle + p.phase).sin() * p.direction;
                b + bounded_swing(b, swing, bounds)
            })
            .collect();

        renormalize(&mut diameters, &held, total, bounds);
        diameters
    }
}

/// Limit `swing` so `base + swing` stays within `bounds`.
fn bounded_swing(base: f32, swing: f32, bounds: DiameterBounds) -> f32 {
    if swing >= 0.0 {
        swing.min((bounds.max - base).max(0.0))
    } else {
        swing.max((bounds.min - base).min(0.0))
    }
}

fn is_held(held: &[bool], index: usize) -> bool {
    held.get(index).copied().unwrap_or(false)
}

/// Adjust `diameters` so they sum to `total`, staying within `bounds`
/// whenever that is possible. Entries flagged in `held` are left as they
/// are; the others make up the difference.
pub fn renormalize(
    diameters: &mut [f32],
    held: &[bool],
    total: f32,
    bounds: DiameterBounds,
) {
    let mut held_sum = 0.0;
    let mut free = Vec::with_capacity(diameters.len());
    for (i, &d) in diameters.iter().enumerate() {
        if is_held(held, i) {
            held_sum += d;
        } else {
            free.push(d);
        }
    }
    if free.is_empty() {
        return;
    }

    renormalize_free(&mut free, total - held_sum, bounds);

    let mut free = free.into_iter();
    for (i, d) in diameters.iter_mut().enumerate() {
        if is_held(held, i) {
            continue;
        }
        if let Some(value) = free.next() {
            *d = value;
        }
    }
}

fn renormalize_free(diameters: &mut [f32], total: f32, bounds: DiameterBounds) {
    distribute_by_room(diameters, total, bounds);

    for d in diameters.iter_mut() {
        *d = d.clamp(bounds.min, bounds.max);
    }
    distribute_by_room(diameters, total, bounds);

    let residual = total - diameters.iter().sum::<f32>();
    if residual.abs() > RESIDUAL_EPSILON {
        let share = residual / diameters.len() as f32;
        for d in diameters.iter_mut() {
            *d += share;
        }
    }
}

/// Spread the residual over circles in proportion to their room to move
/// in the needed direction.
fn distribute_by_room(diameters: &mut [f32], total: f32, bounds: DiameterBounds) {
    let residual = total - diameters.iter().sum::<f32>();
    if residual.abs() <= RESIDUAL_EPSILON {
        return;
    }

    let grow = residual > 0.0;
    let room = |d: f32| {
        if grow {
            (bounds.max - d).max(0.0)
        } else {
            (d - bounds.min).max(0.0)
        }
    };
    let total_room: f32 = diameters.iter().map(|&d| room(d)).sum();
    if total_room <= RESIDUAL_EPSILON {
        return;
    }

    let applied = residual.abs().min(total_room);
    let sign = if grow { 1.0 } else { -1.0 };
    for d in diameters.iter_mut() {
        *d += sign * applied * room(*d) / total_room;
    }
}
