//! Per-circle diameter transitions along the track.
//!
//! Target diameters are recomputed every frame. Rather than snapping, each
//! circle whose target drifted past a tolerance gets a fresh
//! [`CircleTransition`] that eases from its displayed size to the new
//! target. A circle keeps at most one transition; a new target replaces
//! the old one. New circles grow in from zero as appearing transitions;
//! while appearing they are held at their eased size so renormalization
//! cannot inflate them. Circles dropped when the count shrinks ease to
//! zero as disappearing transitions and are pruned once they have vanished.

use rustc_hash::FxHashMap;

use crate::util::easing::EasingFunction;

/// Disappearing circles smaller than this are dropped.
const VANISH_EPSILON: f32 = 1e-2;

/// One circle's diameter easing between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleTransition {
    /// Stable identity of the circle being animated.
    pub id: u64,
    /// Position of the circle in the train when the transition started.
    pub index: usize,
    /// Diameter at `start_time`.
    pub start_value: f32,
    /// Diameter once the transition completes.
    pub end_value: f32,
    /// Time (seconds) the transition began.
    pub start_time: f32,
    /// Whether the circle is growing in from zero.
    pub is_appearing: bool,
    /// Whether the circle is leaving the train.
    pub is_disappearing: bool,
}

impl CircleTransition {
    /// Eased diameter at `t`.
    #[must_use]
    pub fn value(&self, t: f32, duration: f32, easing: EasingFunction) -> f32 {
        let progress = if duration > 0.0 {
            (t - self.start_time) / duration
        } else {
            1.0
        };
        let eased = easing.evaluate(progress);
        self.start_value + (self.end_value - self.start_value) * eased
    }

    /// Whether the transition has run its full duration at `t`.
    #[must_use]
    pub fn is_complete(&self, t: f32, duration: f32) -> bool {
        t - self.start_time >= duration
    }
}

/// A circle's identity and its displayed diameter for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedCircle {
    /// Stable identity.
    pub id: u64,
    /// Position in the train (for disappearing circles, the last one held).
    pub index: usize,
    /// Displayed diameter.
    pub diameter: f32,
    /// Still growing in from zero.
    pub is_appearing: bool,
}

/// Tracks target diameters and the transitions easing toward them.
#[derive(Debug, Clone)]
pub struct CircleSizeTracker {
    targets: Vec<f32>,
    ids: Vec<u64>,
    transitions: FxHashMap<usize, CircleTransition>,
    disappearing: Vec<CircleTransition>,
    next_id: u64,
    duration: f32,
    easing: EasingFunction,
}

impl CircleSizeTracker {
    /// Empty tracker whose transitions last `duration` seconds.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            targets: Vec::new(),
            ids: Vec::new(),
            transitions: FxHashMap::default(),
            disappearing: Vec::new(),
            next_id: 0,
            duration,
            easing: EasingFunction::DEFAULT,
        }
    }

    /// Number of live transitions, disappearing ones included.
    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.len() + self.disappearing.len()
    }

    /// Adopt `targets` immediately with no transitions.
    pub fn snap_to(&mut self, targets: &[f32]) {
        self.transitions.clear();
        self.disappearing.clear();
        self.ids = (0..targets.len()).map(|_| self.allocate_id()).collect();
        self.targets = targets.to_vec();
    }

    /// Compare `targets` with the tracked targets and start transitions for
    /// every circle that drifted more than `tolerance`, plus appearing and
    /// disappearing circles when the count changed. Returns how many
    /// transitions were started.
    pub fn retarget(&mut self, t: f32, targets: &[f32], tolerance: f32) -> usize {
        let mut started = 0;

        for (index, &target) in targets.iter().enumerate() {
            if index < self.targets.len() {
                if (target - self.targets[index]).abs() <= tolerance {
                    continue;
                }
                let from = self.displayed(index, t);
                let appearing = self.is_appearing(index, t);
                self.start(index, from, target, t, appearing);
                self.targets[index] = target;
            } else {
                let id = self.allocate_id();
                self.ids.push(id);
                self.targets.push(target);
                self.start(index, 0.0, target, t, true);
            }
            started += 1;
        }

        for index in targets.len()..self.targets.len() {
            let from = self.displayed(index, t);
            let _ = self.transitions.remove(&index);
            self.disappearing.push(CircleTransition {
                id: self.ids[index],
                index,
                start_value: from,
                end_value: 0.0,
                start_time: t,
                is_appearing: false,
                is_disappearing: true,
            });
            started += 1;
        }
        self.targets.truncate(targets.len());
        self.ids.truncate(targets.len());

        if started > 0 {
            log::trace!(
                "started {started} circle transitions ({} circles)",
                self.targets.len()
            );
        }
        started
    }

    /// Displayed diameter of the circle at `index`.
    #[must_use]
    pub fn displayed(&self, index: usize, t: f32) -> f32 {
        match self.transitions.get(&index) {
            Some(transition) => transition.value(t, self.duration, self.easing),
            None => self.targets.get(index).copied().unwrap_or(0.0),
        }
    }

    /// Whether the circle at `index` is still growing in at `t`.
    #[must_use]
    pub fn is_appearing(&self, index: usize, t: f32) -> bool {
        self.transitions.get(&index).is_some_and(|tr| {
            tr.is_appearing && !tr.is_complete(t, self.duration)
        })
    }

    /// Displayed diameters of the train, in order.
    #[must_use]
    pub fn active(&self, t: f32) -> Vec<SizedCircle> {
        self.ids
            .iter()
            .enumerate()
            .map(|(index, &id)| SizedCircle {
                id,
                index,
                diameter: self.displayed(index, t),
                is_appearing: self.is_appearing(index, t),
            })
            .collect()
    }

    /// Displayed diameters of circles leaving the train.
    #[must_use]
    pub fn fading(&self, t: f32) -> Vec<SizedCircle> {
        self.disappearing
            .iter()
            .map(|tr| SizedCircle {
                id: tr.id,
                index: tr.index,
                diameter: tr.value(t, self.duration, self.easing).max(0.0),
                is_appearing: false,
            })
            .collect()
    }

    /// Drop finished transitions and vanished circles.
    pub fn prune(&mut self, t: f32) {
        let duration = self.duration;
        self.transitions
            .retain(|_, tr| !tr.is_complete(t, duration));

        let easing = self.easing;
        let before = self.disappearing.len();
        self.disappearing.retain(|tr| {
            !tr.is_complete(t, duration)
                || tr.value(t, duration, easing) > VANISH_EPSILON
        });
        let removed = before - self.disappearing.len();
        if removed > 0 {
            log::trace!("removed {removed} vanished circles");
        }
    }

    fn start(
        &mut self,
        index: usize,
        from: f32,
        to: f32,
        t: f32,
        is_appearing: bool,
    ) {
        let id = self.ids[index];
        let _ = self.transitions.insert(
            index,
            CircleTransition {
                id,
                index,
                start_value: from,
                end_value: to,
                start_time: t,
                is_appearing,
                is_disappearing: false,
            },
        );
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
