//! Per-frame orchestration of the bubble's geometry.
//!
//! Each frame combines the mode machine's scalars with the packers:
//!
//! 1. The bubble size springs toward the requested size, frozen to one
//!    text line while a morph holds the width locked.
//! 2. The circle track is the bubble rectangle inset by
//!    `(max_diameter/2 + blur)·(1 − morph)` per side.
//! 3. Target diameters are re-packed from the track perimeter and fed to
//!    the [`CircleSizeTracker`], which only starts transitions for circles
//!    whose target drifted.
//! 4. Displayed diameters oscillate and are renormalized to sum to the
//!    perimeter (circles still growing in are held at their eased size),
//!    then laid end to end along the track from a movement offset that
//!    completes one revolution per period.
//! 5. Positions and sizes are blended toward the track center: by
//!    `1 − morph` normally, or by the emergence scale while coming back
//!    from read. The emergence also scales the reported track.

use glam::Vec2;

use super::frame::{
    BubbleFrame, FrameInputs, RenderCircle, INVALID_PACKING_FILL,
};
use super::mode::{BubbleMode, MessageType, TransientAnimation};
use super::state_machine::BubbleStateMachine;
use crate::animation::{CircleSizeTracker, OscillationProfile, SpringTrack};
use crate::geometry::{
    pack_diameters, pack_discs, DiameterBounds, Disc, DiscPackRequest,
    RoundedRect,
};
use crate::options::BubbleOptions;

/// Indicator parent radii are packed at this granularity and scaled to
/// the exact radius.
const INDICATOR_RADIUS_STEP: f32 = 0.5;
/// Share of the track's inscribed circle the indicator cluster fills.
const INDICATOR_FILL: f32 = 0.6;

/// Cached indicator packing.
#[derive(Debug, Clone)]
struct IndicatorCache {
    parent_radius: f32,
    count: usize,
    message_type: MessageType,
    discs: Vec<Disc>,
}

/// Derives [`BubbleFrame`]s from time, inputs and the mode machine.
#[derive(Debug, Clone)]
pub struct BubbleAnimator {
    options: BubbleOptions,
    seed: u64,
    width: SpringTrack,
    height: SpringTrack,
    tracker: CircleSizeTracker,
    profile: OscillationProfile,
    indicator: Option<IndicatorCache>,
    packing_valid: Option<bool>,
    started: bool,
}

impl BubbleAnimator {
    /// Animator with nothing tracked yet. The first frame snaps to its
    /// inputs.
    #[must_use]
    pub fn new(options: BubbleOptions, seed: u64) -> Self {
        let tracker = CircleSizeTracker::new(options.timing.circle_transition);
        Self {
            options,
            seed,
            width: SpringTrack::new(0.0),
            height: SpringTrack::new(0.0),
            tracker,
            profile: OscillationProfile::new(seed),
            indicator: None,
            packing_valid: None,
            started: false,
        }
    }

    /// Number of circle transitions in flight.
    #[must_use]
    pub fn active_transitions(&self) -> usize {
        self.tracker.transition_count()
    }

    /// Compute the frame at `t` seconds.
    pub fn frame(
        &mut self,
        t: f32,
        inputs: &FrameInputs,
        state: &BubbleStateMachine,
    ) -> BubbleFrame {
        let geometry = &inputs.geometry;
        let size = self.resize(t, inputs, state);

        let morph = state.morph_progress(t);
        let (bounds, _) = geometry.bounds().normalized();
        let inset =
            (bounds.max * 0.5 + geometry.blur_radius) * (1.0 - morph);
        let track = RoundedRect::new(
            Vec2::splat(inset),
            (size - Vec2::splat(2.0 * inset)).max(Vec2::ZERO),
            (geometry.corner_radius - inset).max(0.0),
        );
        let perimeter = track.perimeter();

        let mut packing = pack_diameters(perimeter, geometry.bounds(), self.seed);
        packing.scale_to(perimeter);
        self.note_validity(packing.is_valid, perimeter);

        if self.started {
            let _ = self.tracker.retarget(
                t,
                &packing.diameters,
                self.options.motion.target_drift_tolerance,
            );
        } else {
            self.tracker.snap_to(&packing.diameters);
            self.started = true;
        }

        let (blend, scale_about_center) = match state.transient() {
            Some(TransientAnimation::ReadToThinking) => {
                (state.emergence_scale(t), true)
            }
            _ => (1.0 - morph, false),
        };
        let center = track.center();
        let place = |point: Vec2| center + (point - center) * blend;

        let circles = self.train_circles(t, &track, bounds, blend);
        let shown_track = if scale_about_center {
            RoundedRect::new(
                place(track.origin),
                track.size * blend,
                track.corner_radius * blend,
            )
        } else {
            track
        };

        let indicator_discs = if state.content_visible()
            && state.displayed() == BubbleMode::Thinking
        {
            self.indicator_discs(&track, inputs.message_type)
                .into_iter()
                .map(|d| Disc {
                    center: place(center + d.center),
                    radius: d.radius * blend,
                    is_primary: d.is_primary,
                })
                .collect()
        } else {
            Vec::new()
        };

        self.tracker.prune(t);

        let fill = if packing.is_valid {
            inputs.fill
        } else {
            INVALID_PACKING_FILL
        };

        BubbleFrame {
            time: t,
            size,
            track: shown_track,
            circles,
            indicator_discs,
            blur_radius: geometry.blur_radius
                * if scale_about_center { blend } else { 1.0 },
            alpha_threshold: self.options.motion.alpha_threshold,
            fill,
            opacity: state.opacity(t),
            morph_progress: morph,
            content_visible: state.content_visible(),
            text_layout_included: state.text_layout_included(),
            displayed_mode: state.displayed(),
            dissolve_progress: state.dissolve_progress(t),
            packing_valid: packing.is_valid,
        }
    }

    /// Lay the tracked circles end to end along `track`, oscillated and
    /// renormalized to its perimeter, then blended toward its center.
    fn train_circles(
        &mut self,
        t: f32,
        track: &RoundedRect,
        bounds: DiameterBounds,
        blend: f32,
    ) -> Vec<RenderCircle> {
        let perimeter = track.perimeter();
        let motion = &self.options.motion;
        let active = self.tracker.active(t);
        let diameters = self.profile.apply(
            &active,
            t,
            motion.oscillation_amplitude,
            motion.oscillation_period,
            bounds,
            perimeter,
        );

        let center = track.center();
        let place = |point: Vec2| center + (point - center) * blend;
        let offset = if perimeter > 0.0 {
            (t / motion.revolution_period).fract() * perimeter
        } else {
            0.0
        };

        let mut circles = Vec::with_capacity(active.len());
        let mut along = offset;
        for (circle, &diameter) in active.iter().zip(&diameters) {
            let point = track.point_at(along + diameter * 0.5);
            along += diameter;
            circles.push(RenderCircle {
                id: circle.id,
                center: place(point),
                diameter: diameter * blend,
                is_disappearing: false,
            });
        }

        // Leaving circles shrink at the seam where the train wraps.
        let seam = place(track.point_at(offset));
        circles.extend(self.tracker.fading(t).into_iter().map(|c| {
            RenderCircle {
                id: c.id,
                center: seam,
                diameter: c.diameter * blend,
                is_disappearing: true,
            }
        }));
        circles
    }

    /// Spring the bubble size toward the inputs. The first frame snaps.
    fn resize(
        &mut self,
        t: f32,
        inputs: &FrameInputs,
        state: &BubbleStateMachine,
    ) -> Vec2 {
        let height_target = if state.width_locked() {
            inputs.geometry.single_line_height
        } else {
            inputs.height
        };

        if !self.started {
            self.width.snap(inputs.width);
            self.height.snap(height_target);
        } else {
            let springs = &self.options.springs;
            let cutoff = self.options.timing.resize_cutoff;
            if !state.width_locked() {
                let _ = self.width.set_target(
                    t,
                    inputs.width,
                    springs.resize,
                    cutoff,
                    springs.velocity_boost,
                );
            }
            let _ = self.height.set_target(
                t,
                height_target,
                springs.resize,
                cutoff,
                springs.velocity_boost,
            );
        }

        Vec2::new(self.width.value(t), self.height.value(t)).max(Vec2::ZERO)
    }

    /// Indicator discs relative to the track center, packed once per
    /// quantized radius and scaled to the exact one.
    fn indicator_discs(
        &mut self,
        track: &RoundedRect,
        message_type: MessageType,
    ) -> Vec<Disc> {
        let count = self.options.motion.indicator_disc_count;
        let radius = 0.5 * track.size.min_element() * INDICATOR_FILL;
        if count == 0 || radius <= 0.0 {
            return Vec::new();
        }
        let quantized = (radius / INDICATOR_RADIUS_STEP)
            .round()
            .max(1.0)
            * INDICATOR_RADIUS_STEP;

        let fresh = matches!(
            &self.indicator,
            Some(cache) if cache.parent_radius == quantized
                && cache.count == count
                && cache.message_type == message_type
        );
        let stale = !fresh;
        if stale {
            let request = DiscPackRequest {
                parent_radius: quantized,
                count,
                pinned_angle: message_type.tail_angle(),
                spacing: self.options.motion.indicator_spacing,
            };
            let discs = pack_discs(&request, self.seed);
            log::trace!(
                "packed {} of {count} indicator discs at radius {quantized}",
                discs.len()
            );
            self.indicator = Some(IndicatorCache {
                parent_radius: quantized,
                count,
                message_type,
                discs,
            });
        }

        let Some(cache) = &self.indicator else {
            return Vec::new();
        };
        let scale = radius / cache.parent_radius;
        cache
            .discs
            .iter()
            .map(|d| Disc {
                center: d.center * scale,
                radius: d.radius * scale,
                is_primary: d.is_primary,
            })
            .collect()
    }

    fn note_validity(&mut self, valid: bool, perimeter: f32) {
        if self.packing_valid == Some(valid) {
            return;
        }
        if valid {
            if self.packing_valid.is_some() {
                log::info!("diameter packing valid again (perimeter {perimeter:.2})");
            }
        } else {
            log::warn!(
                "no exact diameter packing for perimeter {perimeter:.2}; \
                 rendering flagged"
            );
        }
        self.packing_valid = Some(valid);
    }
}
