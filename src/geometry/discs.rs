//! Greedy stochastic disc packing inside a circular boundary.
//!
//! A primary "anchor" disc is pinned against the boundary at a fixed angle.
//! Every further disc is the largest one found among a batch of uniformly
//! sampled candidate centers, subject to containment and spacing. The
//! radius and spacing formulas are tuned heuristics, not an optimal packing.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::util::rng::Lcg64;

/// Candidate centers sampled per placed disc, before scaling with count.
const BASE_SAMPLES: usize = 4000;
/// Extra candidates per requested disc.
const SAMPLES_PER_DISC: usize = 250;
/// Best candidate radius at or below this stops packing early.
const MIN_USEFUL_RADIUS: f32 = 1e-3;
/// Reference size in the primary-radius heuristic.
const PRIMARY_SCALE: f32 = 65.0;
/// Exponent in the primary-radius heuristic.
const PRIMARY_EXPONENT: f32 = 0.3;

/// A placed disc, relative to the boundary center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    /// Center offset from the boundary center.
    pub center: Vec2,
    /// Disc radius.
    pub radius: f32,
    /// Whether this is the pinned anchor disc.
    pub is_primary: bool,
}

/// Inputs for one packing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscPackRequest {
    /// Radius of the circular boundary.
    pub parent_radius: f32,
    /// Number of discs wanted, anchor included.
    pub count: usize,
    /// Direction (radians, screen coordinates) the anchor is pushed toward.
    pub pinned_angle: f32,
    /// Minimum gap between discs.
    pub spacing: f32,
}

/// Radius of the anchor disc: `R / (1 + (R/65 · (N−1))^0.3)`.
#[must_use]
pub fn primary_radius(parent_radius: f32, count: usize) -> f32 {
    let others = count.saturating_sub(1) as f32;
    let growth =
        (parent_radius / PRIMARY_SCALE * others).powf(PRIMARY_EXPONENT);
    parent_radius / (1.0 + growth)
}

/// Largest radius a new disc at center distance `distance` from an existing
/// disc of radius `existing` may take.
///
/// Small discs keep a spacing proportional to their own size relative to
/// the anchor; once they would outgrow the existing disc the spacing is
/// taken relative to the existing disc instead.
#[must_use]
pub fn secondary_spacing_limit(
    existing: f32,
    distance: f32,
    primary: f32,
    spacing: f32,
) -> f32 {
    if spacing <= 0.0 || primary <= 0.0 {
        return distance - existing;
    }
    let k = spacing / primary;
    let within = (distance - existing) / (1.0 + k);
    if within <= existing {
        within
    } else {
        (distance - existing * (1.0 + k)).max(0.0)
    }
}

/// Pack discs with a generator seeded from `seed`.
#[must_use]
pub fn pack_discs(request: &DiscPackRequest, seed: u64) -> Vec<Disc> {
    let mut rng = Lcg64::new(seed);
    pack_discs_with(request, &mut rng)
}

/// Pack discs with an injected generator. The anchor comes first; the
/// result may hold fewer than `count` discs when space runs out.
pub fn pack_discs_with<R: Rng + ?Sized>(
    request: &DiscPackRequest,
    rng: &mut R,
) -> Vec<Disc> {
    let parent = request.parent_radius;
    if request.count == 0 || parent.is_nan() || parent <= 0.0 {
        return Vec::new();
    }

    let p = primary_radius(parent, request.count);
    let direction = Vec2::from_angle(request.pinned_angle);
    let primary = Disc {
        center: direction * (parent - p),
        radius: p,
        is_primary: true,
    };

    let mut discs = Vec::with_capacity(request.count);
    discs.push(primary);

    let samples = BASE_SAMPLES + SAMPLES_PER_DISC * request.count;
    for _ in 1..request.count {
        let Some(next) = best_candidate(request, &discs, samples, rng) else {
            log::trace!(
                "disc packing stopped at {} of {}",
                discs.len(),
                request.count
            );
            break;
        };
        discs.push(next);
    }
    discs
}

/// Sample candidate centers and keep the one admitting the largest radius.
fn best_candidate<R: Rng + ?Sized>(
    request: &DiscPackRequest,
    placed: &[Disc],
    samples: usize,
    rng: &mut R,
) -> Option<Disc> {
    let parent = request.parent_radius;
    let primary = placed[0];
    let mut best: Option<Disc> = None;

    for _ in 0..samples {
        let u: f32 = rng.random();
        let v: f32 = rng.random();
        let center = Vec2::from_angle(TAU * v) * (parent * u.sqrt());

        let radius = max_radius_at(center, request, primary, &placed[1..]);
        if radius > best.map_or(0.0, |d| d.radius) {
            best = Some(Disc {
                center,
                radius,
                is_primary: false,
            });
        }
    }

    best.filter(|d| d.radius > MIN_USEFUL_RADIUS)
}

/// Largest radius admissible at `center`.
fn max_radius_at(
    center: Vec2,
    request: &DiscPackRequest,
    primary: Disc,
    others: &[Disc],
) -> f32 {
    let boundary = request.parent_radius - center.length();
    let from_primary =
        center.distance(primary.center) - primary.radius - request.spacing;

    others.iter().fold(boundary.min(from_primary), |limit, other| {
        let d = center.distance(other.center);
        limit.min(secondary_spacing_limit(
            other.radius,
            d,
            primary.radius,
            request.spacing,
        ))
    })
}
