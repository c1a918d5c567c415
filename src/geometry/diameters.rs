//! Exact-sum diameter partitioning.
//!
//! Splits a track length into circle diameters that sum to the length and
//! each stay within `[min, max]`. When an equal split exists the count whose
//! diameter lands closest to the preferred size wins; near-ties are broken
//! by the seeded RNG so different bubbles do not all look alike. When no
//! count works, a best-effort set is returned and flagged invalid.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::util::rng::Lcg64;

/// Allowed gap between the set's sum and the requested length.
pub const SUM_TOLERANCE: f32 = 1e-3;

/// Counts whose deviation from the preferred size is within this of the best
/// are considered tied.
const TIE_TOLERANCE: f32 = 0.01;

/// Smallest lower bound accepted; anything below is raised to this and the
/// result is flagged.
const MIN_DIAMETER_FLOOR: f32 = 1e-2;

/// Inclusive diameter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiameterBounds {
    /// Smallest allowed diameter.
    pub min: f32,
    /// Largest allowed diameter.
    pub max: f32,
}

impl DiameterBounds {
    /// Bounds from `min` and `max` as given (not normalized).
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Midpoint of the bounds.
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        0.5 * (self.min + self.max)
    }

    /// Whether `d` lies within the bounds, allowing float slop.
    #[must_use]
    pub fn contains(&self, d: f32) -> bool {
        d >= self.min - SUM_TOLERANCE && d <= self.max + SUM_TOLERANCE
    }

    /// Replace a non-finite maximum, swap inverted bounds and raise a
    /// non-positive or non-finite minimum. Returns the usable bounds and
    /// whether anything had to be corrected.
    #[must_use]
    pub fn normalized(self) -> (Self, bool) {
        let mut corrected = false;
        let (mut min, mut max) = (self.min, self.max);
        if !max.is_finite() {
            max = if min.is_finite() { min } else { MIN_DIAMETER_FLOOR };
            corrected = true;
        }
        if min > max {
            std::mem::swap(&mut min, &mut max);
            corrected = true;
        }
        if !min.is_finite() || min < MIN_DIAMETER_FLOOR {
            min = MIN_DIAMETER_FLOOR;
            max = max.max(min);
            corrected = true;
        }
        (Self { min, max }, corrected)
    }
}

/// Ordered diameters that sum to a target length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterSet {
    /// Diameters in placement order.
    pub diameters: Vec<f32>,
    /// False when the bounds had to be corrected or no exact in-bounds
    /// partition exists. The diameters are still the best effort.
    pub is_valid: bool,
}

impl DiameterSet {
    /// Sum of all diameters.
    #[must_use]
    pub fn sum(&self) -> f32 {
        self.diameters.iter().sum()
    }

    /// Number of diameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diameters.len()
    }

    /// Whether the set is empty (never the case for packer output).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diameters.is_empty()
    }

    /// Rescale so the diameters sum to exactly `length`.
    pub fn scale_to(&mut self, length: f32) {
        let sum = self.sum();
        if sum <= f32::EPSILON {
            return;
        }
        let factor = length / sum;
        for d in &mut self.diameters {
            *d *= factor;
        }
    }
}

/// Partition `length` into diameters within `bounds`, preferring the
/// bounds' midpoint. Deterministic for a fixed `seed`.
///
/// The midpoint preference favors more, smaller circles: 100 with
/// `[10, 20]` gives seven diameters of about 14.3. Use
/// [`pack_diameters_toward`] with `preferred = bounds.max` to get the
/// fewest circles instead (five of 20 for the same input).
#[must_use]
pub fn pack_diameters(
    length: f32,
    bounds: DiameterBounds,
    seed: u64,
) -> DiameterSet {
    let mut rng = Lcg64::new(seed);
    pack_diameters_with(length, bounds, &mut rng)
}

/// [`pack_diameters`] with an injected generator.
pub fn pack_diameters_with<R: Rng + ?Sized>(
    length: f32,
    bounds: DiameterBounds,
    rng: &mut R,
) -> DiameterSet {
    let (normalized, _) = bounds.normalized();
    pack_diameters_toward(length, bounds, normalized.midpoint(), rng)
}

/// Partition `length` into diameters within `bounds`, choosing the equal
/// split whose diameter is closest to `preferred`.
pub fn pack_diameters_toward<R: Rng + ?Sized>(
    length: f32,
    bounds: DiameterBounds,
    preferred: f32,
    rng: &mut R,
) -> DiameterSet {
    let (bounds, corrected) = bounds.normalized();

    if !length.is_finite() || length <= 0.0 {
        return DiameterSet {
            diameters: vec![length.max(0.0)],
            is_valid: false,
        };
    }

    let min_count = ((length / bounds.max).ceil() as usize).max(1);
    let max_count = (length / bounds.min).floor() as usize;

    if min_count <= max_count {
        let count =
            choose_equal_count(length, min_count, max_count, preferred, rng);
        return DiameterSet {
            diameters: vec![length / count as f32; count],
            is_valid: !corrected,
        };
    }

    let (diameters, fits) = fill_best_effort(length, bounds);
    DiameterSet {
        diameters,
        is_valid: fits && !corrected,
    }
}

/// Pick the count in `[min_count, max_count]` whose equal diameter is
/// closest to `preferred`, breaking near-ties at random.
fn choose_equal_count<R: Rng + ?Sized>(
    length: f32,
    min_count: usize,
    max_count: usize,
    preferred: f32,
    rng: &mut R,
) -> usize {
    let deviation = |m: usize| (length / m as f32 - preferred).abs();

    let best = (min_count..=max_count)
        .map(deviation)
        .fold(f32::INFINITY, f32::min);

    let tied: Vec<usize> = (min_count..=max_count)
        .filter(|&m| deviation(m) <= best + TIE_TOLERANCE)
        .collect();

    match tied.len() {
        0 => min_count,
        1 => tied[0],
        n => tied[rng.random_range(0..n)],
    }
}

/// Fill with min-sized circles, spread the leftover round-robin up to each
/// circle's max, then append one absorbing circle. Returns the diameters
/// and whether every diameter ended up in bounds.
fn fill_best_effort(length: f32, bounds: DiameterBounds) -> (Vec<f32>, bool) {
    let count = (length / bounds.min).floor() as usize;
    let mut diameters = vec![bounds.min; count];
    let mut leftover = length - bounds.min * count as f32;

    while leftover > SUM_TOLERANCE {
        let mut absorbed_any = false;
        for d in &mut diameters {
            let take = (bounds.max - *d).min(leftover);
            if take > 0.0 {
                *d += take;
                leftover -= take;
                absorbed_any = true;
            }
            if leftover <= SUM_TOLERANCE {
                break;
            }
        }
        if !absorbed_any {
            break;
        }
    }

    if leftover <= SUM_TOLERANCE {
        return (diameters, true);
    }

    // Keep the sum exact even when the remainder is out of bounds; callers
    // rely on the train covering the whole track.
    let fits = bounds.contains(leftover);
    diameters.push(leftover);
    (diameters, fits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sums_to(set: &DiameterSet, length: f32) {
        assert!(
            (set.sum() - length).abs() <= SUM_TOLERANCE,
            "sum {} != {length}",
            set.sum()
        );
    }

    #[test]
    fn test_largest_preference_gives_five_twenties() {
        let bounds = DiameterBounds::new(10.0, 20.0);
        let mut rng = Lcg64::new(1);
        let set = pack_diameters_toward(100.0, bounds, bounds.max, &mut rng);
        assert!(set.is_valid);
        assert_eq!(set.diameters, vec![20.0; 5]);
        assert_sums_to(&set, 100.0);
    }

    #[test]
    fn test_ninety_five_prefers_feasible_five() {
        let bounds = DiameterBounds::new(10.0, 20.0);
        let mut rng = Lcg64::new(1);
        let set = pack_diameters_toward(95.0, bounds, bounds.max, &mut rng);
        assert!(set.is_valid);
        assert_eq!(set.len(), 5);
        for d in &set.diameters {
            assert!((d - 19.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_midpoint_preference() {
        // 100 / 7 ≈ 14.29 is the closest equal split to 15.
        let set = pack_diameters(100.0, DiameterBounds::new(10.0, 20.0), 5);
        assert!(set.is_valid);
        assert_eq!(set.len(), 7);
        assert_sums_to(&set, 100.0);
    }

    #[test]
    fn test_valid_inputs_sum_and_stay_in_bounds() {
        let cases = [
            (100.0, 10.0, 20.0),
            (333.3, 14.0, 24.0),
            (512.0, 8.0, 9.0),
            (24.0, 24.0, 24.0),
            (1000.0, 3.0, 50.0),
        ];
        for (length, min, max) in cases {
            let bounds = DiameterBounds::new(min, max);
            let set = pack_diameters(length, bounds, 11);
            assert!(set.is_valid, "{length} in [{min}, {max}]");
            assert_sums_to(&set, length);
            for d in &set.diameters {
                assert!(bounds.contains(*d), "{d} out of [{min}, {max}]");
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let bounds = DiameterBounds::new(10.0, 30.0);
        for length in [97.0, 240.0, 401.5] {
            let a = pack_diameters(length, bounds, 77);
            let b = pack_diameters(length, bounds, 77);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_ties_use_rng() {
        let bounds = DiameterBounds::new(10.0, 20.0);
        let mut counts = std::collections::BTreeSet::new();
        for seed in 0..64 {
            let mut rng = Lcg64::new(seed);
            let set = pack_diameters_toward(100.0, bounds, 15.0, &mut rng);
            let _ = counts.insert(set.len());
        }
        // 7 is the unique best for 15.0; no tie exists.
        assert_eq!(counts.len(), 1);

        let mut counts = std::collections::BTreeSet::new();
        for seed in 0..64 {
            let mut rng = Lcg64::new(seed);
            let preferred = 0.5 * (100.0 / 7.0 + 100.0 / 8.0);
            let set = pack_diameters_toward(100.0, bounds, preferred, &mut rng);
            let _ = counts.insert(set.len());
        }
        // Preferred size sits halfway between the 7- and 8-circle splits.
        assert!(counts.contains(&7) && counts.contains(&8));
    }

    #[test]
    fn test_infeasible_is_flagged_best_effort() {
        let bounds = DiameterBounds::new(10.0, 12.0);
        let set = pack_diameters(25.0, bounds, 3);
        assert!(!set.is_valid);
        assert_sums_to(&set, 25.0);
        assert_eq!(set.diameters, vec![12.0, 12.0, 1.0]);
    }

    #[test]
    fn test_length_below_min_is_flagged() {
        let set = pack_diameters(5.0, DiameterBounds::new(10.0, 20.0), 3);
        assert!(!set.is_valid);
        assert_eq!(set.len(), 1);
        assert_sums_to(&set, 5.0);
    }

    #[test]
    fn test_swapped_bounds_are_corrected_and_flagged() {
        let set = pack_diameters(100.0, DiameterBounds::new(20.0, 10.0), 3);
        assert!(!set.is_valid);
        assert_sums_to(&set, 100.0);
        for d in &set.diameters {
            assert!(DiameterBounds::new(10.0, 20.0).contains(*d));
        }
    }

    #[test]
    fn test_non_finite_bounds_are_corrected_and_flagged() {
        let (bounds, corrected) = DiameterBounds::new(14.0, f32::NAN).normalized();
        assert!(corrected);
        assert_eq!(bounds, DiameterBounds::new(14.0, 14.0));

        let (bounds, corrected) =
            DiameterBounds::new(f32::NAN, f32::INFINITY).normalized();
        assert!(corrected);
        assert!(bounds.min.is_finite() && bounds.max.is_finite());
        assert!(bounds.min <= bounds.max);

        let set = pack_diameters(100.0, DiameterBounds::new(14.0, f32::NAN), 3);
        assert!(!set.is_valid);
        assert!(set.diameters.iter().all(|d| d.is_finite()));
        assert_sums_to(&set, 100.0);
    }

    #[test]
    fn test_zero_length_still_has_one_entry() {
        let set = pack_diameters(0.0, DiameterBounds::new(10.0, 20.0), 3);
        assert!(!set.is_valid);
        assert_eq!(set.diameters, vec![0.0]);
    }

    #[test]
    fn test_scale_to_exact_length() {
        let mut set = DiameterSet {
            diameters: vec![10.0, 10.0, 20.0],
            is_valid: true,
        };
        set.scale_to(80.0);
        assert_eq!(set.diameters, vec![20.0, 20.0, 40.0]);
    }
}
