//! Mode transitions between thinking, talking and read.
//!
//! The machine distinguishes the *requested* mode (the last
//! [`request`](BubbleStateMachine::request)) from the *displayed* mode (what
//! the bubble currently renders as). They differ while a transition's
//! follow-up is pending: the explosion has to finish before the bubble
//! becomes read, and read → talking waits a few milliseconds before it
//! flips. Each transition schedules at most one follow-up and keeps its
//! [`CancelToken`]; the next request cancels that token before scheduling
//! its own, so a stale follow-up can never mutate state.

use super::mode::{BubbleMode, TransientAnimation};
use crate::animation::{
    CancelToken, DeferredQueue, Spring, SpringParams, Tween,
};
use crate::options::TimingOptions;
use crate::util::easing::EasingFunction;

/// Easing of morph progress and opacity fades.
const FADE_EASING: EasingFunction = EasingFunction::SineInOut;

/// Work scheduled by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FollowUp {
    /// Morph finished: unlock width, include text if talking.
    CompleteMorph,
    /// Emergence finished: reveal the indicator content.
    FinishEmergence,
    /// Dissolve finished: become read and reset.
    FinishExplosion,
    /// Flip the displayed mode.
    FlipDisplayed(BubbleMode),
    /// Fade-out finished: become read and reset.
    FinishFade,
}

/// Tracks the bubble's mode and the scalar animations tied to it.
#[derive(Debug, Clone)]
pub struct BubbleStateMachine {
    timing: TimingOptions,
    emergence_params: SpringParams,
    requested: BubbleMode,
    displayed: BubbleMode,
    transient: Option<TransientAnimation>,
    transient_start: f32,
    morph: Tween,
    opacity: Tween,
    emergence: Spring,
    width_locked: bool,
    text_layout_included: bool,
    content_visible: bool,
    follow_ups: DeferredQueue<FollowUp>,
    transition: Option<CancelToken>,
}

impl BubbleStateMachine {
    /// Machine in the initial thinking state.
    #[must_use]
    pub fn new(timing: TimingOptions, emergence_params: SpringParams) -> Self {
        Self {
            timing,
            emergence_params,
            requested: BubbleMode::Thinking,
            displayed: BubbleMode::Thinking,
            transient: None,
            transient_start: 0.0,
            morph: Tween::fixed(0.0),
            opacity: Tween::fixed(1.0),
            emergence: Spring::at_rest(1.0),
            width_locked: false,
            text_layout_included: false,
            content_visible: true,
            follow_ups: DeferredQueue::new(),
            transition: None,
        }
    }

    /// Mode most recently requested.
    #[must_use]
    pub fn requested(&self) -> BubbleMode {
        self.requested
    }

    /// Mode currently rendered.
    #[must_use]
    pub fn displayed(&self) -> BubbleMode {
        self.displayed
    }

    /// Active sub-animation, if any.
    #[must_use]
    pub fn transient(&self) -> Option<TransientAnimation> {
        self.transient
    }

    /// Morph progress at `t`: 0 is the thinking layout, 1 talking.
    #[must_use]
    pub fn morph_progress(&self, t: f32) -> f32 {
        self.morph.value(t)
    }

    /// Bubble opacity at `t`.
    #[must_use]
    pub fn opacity(&self, t: f32) -> f32 {
        self.opacity.value(t).clamp(0.0, 1.0)
    }

    /// Uniform scale of the whole bubble about its center at `t`. Below 1
    /// only while emerging from read; may overshoot past 1.
    #[must_use]
    pub fn emergence_scale(&self, t: f32) -> f32 {
        match self.transient {
            Some(TransientAnimation::ReadToThinking) => {
                self.emergence.value(t).max(0.0)
            }
            _ => 1.0,
        }
    }

    /// Progress of the external dissolve effect, while it plays.
    #[must_use]
    pub fn dissolve_progress(&self, t: f32) -> Option<f32> {
        if self.transient != Some(TransientAnimation::ThinkingToReadExplosion)
        {
            return None;
        }
        let elapsed = t - self.transient_start;
        Some(if self.timing.explosion > 0.0 {
            (elapsed / self.timing.explosion).clamp(0.0, 1.0)
        } else {
            1.0
        })
    }

    /// Whether the width is frozen for a running morph.
    #[must_use]
    pub fn width_locked(&self) -> bool {
        self.width_locked
    }

    /// Whether message text takes part in sizing the bubble.
    #[must_use]
    pub fn text_layout_included(&self) -> bool {
        self.text_layout_included
    }

    /// Whether the bubble's content (indicator or text) is shown.
    #[must_use]
    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    /// Number of follow-ups waiting to fire.
    #[must_use]
    pub fn pending_follow_ups(&self) -> usize {
        self.follow_ups.len()
    }

    /// Start the transition to `mode` at `t`. Returns false if `mode` is
    /// already the requested mode.
    pub fn request(&mut self, mode: BubbleMode, t: f32) -> bool {
        let from = self.requested;
        if mode == from {
            return false;
        }
        let stale = self.transition.take();
        let canceled = stale.is_some_and(|token| self.follow_ups.cancel(token));
        log::debug!(
            "bubble {from} -> {mode} at {t:.3}s{}",
            if canceled { " (pending follow-up canceled)" } else { "" }
        );
        self.requested = mode;
        self.transient = None;

        match (from, mode) {
            (BubbleMode::Thinking, BubbleMode::Talking) => {
                self.displayed = BubbleMode::Talking;
                self.begin_morph(t, 1.0);
                self.opacity = Tween::fixed(1.0);
                self.content_visible = true;
            }
            (BubbleMode::Talking, BubbleMode::Thinking) => {
                self.displayed = BubbleMode::Thinking;
                self.begin_morph(t, 0.0);
                self.opacity = Tween::fixed(1.0);
                self.content_visible = true;
            }
            (BubbleMode::Read, BubbleMode::Thinking) => {
                self.displayed = BubbleMode::Thinking;
                self.transient = Some(TransientAnimation::ReadToThinking);
                self.transient_start = t;
                self.emergence = Spring::new(
                    0.0,
                    1.0,
                    t,
                    0.0,
                    self.emergence_params,
                    self.timing.read_to_thinking,
                );
                self.morph = Tween::fixed(0.0);
                self.opacity = Tween::fixed(1.0);
                self.width_locked = false;
                self.text_layout_included = false;
                self.content_visible = false;
                self.transition = Some(self.follow_ups.schedule(
                    t + self.timing.read_to_thinking,
                    FollowUp::FinishEmergence,
                ));
            }
            (BubbleMode::Thinking, BubbleMode::Read) => {
                self.transient =
                    Some(TransientAnimation::ThinkingToReadExplosion);
                self.transient_start = t;
                self.morph = Tween::fixed(self.morph.value(t));
                self.content_visible = false;
                self.transition = Some(self.follow_ups.schedule(
                    t + self.timing.explosion,
                    FollowUp::FinishExplosion,
                ));
            }
            (BubbleMode::Read, BubbleMode::Talking) => {
                self.morph = Tween::fixed(1.0);
                self.opacity = Tween::fixed(1.0);
                self.width_locked = false;
                self.text_layout_included = true;
                self.content_visible = true;
                self.transition = Some(self.follow_ups.schedule(
                    t + self.timing.mode_flip_delay,
                    FollowUp::FlipDisplayed(BubbleMode::Talking),
                ));
            }
            (BubbleMode::Talking, BubbleMode::Read) => {
                self.opacity = Tween::new(
                    self.opacity.value(t),
                    0.0,
                    t,
                    self.timing.morph,
                    FADE_EASING,
                );
                self.width_locked = false;
                self.transition = Some(
                    self.follow_ups
                        .schedule(t + self.timing.morph, FollowUp::FinishFade),
                );
            }
            // Same-mode requests returned early above.
            _ => {}
        }
        true
    }

    /// Fire every follow-up due at `t`. Returns how many fired.
    pub fn advance(&mut self, t: f32) -> usize {
        let due = self.follow_ups.drain_due(t);
        let fired = due.len();
        for follow_up in due {
            log::trace!("follow-up {follow_up:?} fired at {t:.3}s");
            self.apply(follow_up);
        }
        fired
    }

    /// Drop every pending follow-up without running it.
    pub fn cancel_pending(&mut self) -> usize {
        self.transition = None;
        self.follow_ups.cancel_all()
    }

    fn begin_morph(&mut self, t: f32, to: f32) {
        self.morph =
            Tween::new(self.morph.value(t), to, t, self.timing.morph, FADE_EASING);
        self.width_locked = true;
        self.text_layout_included = false;
        self.transition = Some(
            self.follow_ups
                .schedule(t + self.timing.morph, FollowUp::CompleteMorph),
        );
    }

    fn apply(&mut self, follow_up: FollowUp) {
        match follow_up {
            FollowUp::CompleteMorph => {
                self.width_locked = false;
                self.text_layout_included =
                    self.displayed == BubbleMode::Talking;
            }
            FollowUp::FinishEmergence => {
                self.transient = None;
                self.content_visible = true;
            }
            FollowUp::FinishExplosion | FollowUp::FinishFade => {
                self.transient = None;
                self.displayed = BubbleMode::Read;
                self.reset();
            }
            FollowUp::FlipDisplayed(mode) => {
                self.displayed = mode;
            }
        }
    }

    /// Back to the collapsed, invisible layout a read bubble keeps.
    fn reset(&mut self) {
        self.morph = Tween::fixed(0.0);
        self.opacity = Tween::fixed(0.0);
        self.emergence = Spring::at_rest(1.0);
        self.width_locked = false;
        self.text_layout_included = false;
        self.content_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> BubbleStateMachine {
        BubbleStateMachine::new(
            TimingOptions::default(),
            SpringParams::new(0.55, 0.5),
        )
    }

    fn timing() -> TimingOptions {
        TimingOptions::default()
    }

    #[test]
    fn test_initial_state_is_thinking() {
        let m = machine();
        assert_eq!(m.displayed(), BubbleMode::Thinking);
        assert_eq!(m.requested(), BubbleMode::Thinking);
        assert_eq!(m.morph_progress(0.0), 0.0);
        assert_eq!(m.opacity(0.0), 1.0);
        assert_eq!(m.emergence_scale(0.0), 1.0);
        assert!(m.content_visible());
        assert!(!m.width_locked());
        assert_eq!(m.pending_follow_ups(), 0);
    }

    #[test]
    fn test_same_mode_request_is_ignored() {
        let mut m = machine();
        assert!(!m.request(BubbleMode::Thinking, 1.0));
        assert_eq!(m.pending_follow_ups(), 0);
    }

    #[test]
    fn test_thinking_to_talking_locks_until_morph_completes() {
        let mut m = machine();
        let morph = timing().morph;
        assert!(m.request(BubbleMode::Talking, 1.0));
        assert_eq!(m.displayed(), BubbleMode::Talking);
        assert!(m.width_locked());
        assert!(!m.text_layout_included());

        let mid = m.morph_progress(1.0 + morph / 2.0);
        assert!((mid - 0.5).abs() < 1e-4);

        assert_eq!(m.advance(1.0 + morph * 0.9), 0);
        assert!(m.width_locked());
        assert_eq!(m.advance(1.0 + morph), 1);
        assert!(!m.width_locked());
        assert!(m.text_layout_included());
        assert!((m.morph_progress(1.0 + morph) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reversing_mid_morph_continues_from_current_progress() {
        let mut m = machine();
        let morph = timing().morph;
        let _ = m.request(BubbleMode::Talking, 0.0);
        let t = morph * 0.4;
        let progress = m.morph_progress(t);
        let _ = m.request(BubbleMode::Thinking, t);
        assert!((m.morph_progress(t) - progress).abs() < 1e-6);
        assert_eq!(m.pending_follow_ups(), 1);
        let _ = m.advance(t + morph);
        assert!(m.morph_progress(t + morph).abs() < 1e-6);
        assert!(!m.text_layout_included());
        assert!(!m.width_locked());
    }

    #[test]
    fn test_thinking_to_read_freezes_then_flips() {
        let mut m = machine();
        let explosion = timing().explosion;
        let _ = m.request(BubbleMode::Read, 2.0);
        assert_eq!(m.displayed(), BubbleMode::Thinking);
        assert_eq!(
            m.transient(),
            Some(TransientAnimation::ThinkingToReadExplosion)
        );
        assert_eq!(m.morph_progress(2.2), 0.0);
        let half = m.dissolve_progress(2.0 + explosion / 2.0).unwrap();
        assert!((half - 0.5).abs() < 1e-4);

        let _ = m.advance(2.0 + explosion);
        assert_eq!(m.displayed(), BubbleMode::Read);
        assert_eq!(m.transient(), None);
        assert_eq!(m.dissolve_progress(3.0), None);
        assert_eq!(m.opacity(3.0), 0.0);
    }

    #[test]
    fn test_read_to_thinking_emerges_then_reveals() {
        let mut m = machine();
        let t = timing();
        let _ = m.request(BubbleMode::Read, 0.0);
        let _ = m.advance(t.explosion);

        let start = 5.0;
        let _ = m.request(BubbleMode::Thinking, start);
        assert_eq!(m.displayed(), BubbleMode::Thinking);
        assert_eq!(m.emergence_scale(start), 0.0);
        assert!(!m.content_visible());
        let growing = m.emergence_scale(start + t.read_to_thinking * 0.3);
        assert!(growing > 0.0);

        let _ = m.advance(start + t.read_to_thinking);
        assert!(m.content_visible());
        assert_eq!(m.emergence_scale(start + t.read_to_thinking), 1.0);
    }

    #[test]
    fn test_round_trip_through_read_restores_thinking() {
        let mut m = machine();
        let t = timing();
        let before = (
            m.displayed(),
            m.morph_progress(0.0),
            m.opacity(0.0),
            m.content_visible(),
            m.width_locked(),
            m.text_layout_included(),
        );

        let _ = m.request(BubbleMode::Read, 1.0);
        let _ = m.advance(1.0 + t.explosion);
        let _ = m.request(BubbleMode::Thinking, 3.0);
        let end = 3.0 + t.read_to_thinking;
        let _ = m.advance(end);

        let after = (
            m.displayed(),
            m.morph_progress(end),
            m.opacity(end),
            m.content_visible(),
            m.width_locked(),
            m.text_layout_included(),
        );
        assert_eq!(before, after);
        assert_eq!(m.emergence_scale(end), 1.0);
        assert_eq!(m.transient(), None);
        assert_eq!(m.pending_follow_ups(), 0);
    }

    #[test]
    fn test_read_to_talking_reveals_now_and_flips_later() {
        let mut m = machine();
        let t = timing();
        let _ = m.request(BubbleMode::Read, 0.0);
        let _ = m.advance(t.explosion);

        let _ = m.request(BubbleMode::Talking, 1.0);
        assert!(m.content_visible());
        assert_eq!(m.morph_progress(1.0), 1.0);
        assert_eq!(m.displayed(), BubbleMode::Read);
        let _ = m.advance(1.0 + t.mode_flip_delay / 2.0);
        assert_eq!(m.displayed(), BubbleMode::Read);
        let _ = m.advance(1.0 + t.mode_flip_delay);
        assert_eq!(m.displayed(), BubbleMode::Talking);
    }

    #[test]
    fn test_talking_to_read_fades_without_explosion() {
        let mut m = machine();
        let t = timing();
        let _ = m.request(BubbleMode::Talking, 0.0);
        let _ = m.advance(t.morph);

        let _ = m.request(BubbleMode::Read, 1.0);
        assert_eq!(m.transient(), None);
        let fading = m.opacity(1.0 + t.morph / 2.0);
        assert!(fading > 0.0 && fading < 1.0);
        let _ = m.advance(1.0 + t.morph);
        assert_eq!(m.displayed(), BubbleMode::Read);
        assert_eq!(m.opacity(1.0 + t.morph), 0.0);
    }

    #[test]
    fn test_canceled_flip_never_lands() {
        let mut m = machine();
        let t = timing();
        let _ = m.request(BubbleMode::Read, 0.0);
        let _ = m.advance(t.explosion);

        let _ = m.request(BubbleMode::Talking, 1.0);
        assert_eq!(m.cancel_pending(), 1);
        assert_eq!(m.advance(10.0), 0);
        assert_eq!(m.displayed(), BubbleMode::Read);
    }

    #[test]
    fn test_new_request_cancels_stale_explosion() {
        let mut m = machine();
        let t = timing();
        let _ = m.request(BubbleMode::Read, 0.0);
        let _ = m.request(BubbleMode::Thinking, t.explosion * 0.5);
        // Only the emergence follow-up remains.
        assert_eq!(m.pending_follow_ups(), 1);
        let _ = m.advance(10.0);
        assert_eq!(m.displayed(), BubbleMode::Thinking);
        assert!(m.opacity(10.0) > 0.99);
    }

    #[test]
    fn test_request_after_fired_follow_up_keeps_only_its_own() {
        let mut m = machine();
        let t = timing();
        let _ = m.request(BubbleMode::Talking, 0.0);
        assert_eq!(m.advance(t.morph), 1);
        // The fired token is stale; the fade is the only pending work.
        let _ = m.request(BubbleMode::Read, 1.0);
        assert_eq!(m.pending_follow_ups(), 1);
        let _ = m.request(BubbleMode::Talking, 1.1);
        assert_eq!(m.pending_follow_ups(), 1);
        // Only the flip fires; the canceled fade never resets the bubble.
        assert_eq!(m.advance(2.0 + t.morph), 1);
        assert_eq!(m.displayed(), BubbleMode::Talking);
        assert_eq!(m.opacity(2.0 + t.morph), 1.0);
    }
}
