//! The thought bubble: one instance owning its mode machine, animator and
//! seed.
//!
//! A [`ThoughtBubble`] is driven by its owner's frame loop. Each
//! [`tick`](ThoughtBubble::tick) fires the follow-ups that came due, applies
//! a mode change carried by the inputs, and derives a [`BubbleFrame`].
//! Time is taken as a [`web_time::Instant`] and converted to seconds since
//! the bubble's epoch; everything below works on those seconds.
//!
//! Dropping a bubble cancels its pending follow-ups.

pub mod animator;
pub mod frame;
pub mod mode;
pub mod state_machine;

pub use animator::BubbleAnimator;
pub use frame::{BubbleFrame, FrameInputs, RenderCircle, INVALID_PACKING_FILL};
pub use mode::{BubbleMode, MessageType, TransientAnimation};
pub use state_machine::BubbleStateMachine;
use web_time::Instant;

use crate::options::BubbleOptions;

/// A single animated thought bubble.
#[derive(Debug)]
pub struct ThoughtBubble {
    seed: u64,
    epoch: Instant,
    state: BubbleStateMachine,
    animator: BubbleAnimator,
}

impl ThoughtBubble {
    /// Bubble in the thinking state whose clock starts now.
    #[must_use]
    pub fn new(options: BubbleOptions, seed: u64) -> Self {
        Self::with_epoch(options, seed, Instant::now())
    }

    /// Bubble whose clock starts at `epoch`.
    #[must_use]
    pub fn with_epoch(options: BubbleOptions, seed: u64, epoch: Instant) -> Self {
        log::debug!("creating thought bubble (seed {seed:#x})");
        let state = BubbleStateMachine::new(
            options.timing.clone(),
            options.springs.emergence,
        );
        Self {
            seed,
            epoch,
            state,
            animator: BubbleAnimator::new(options, seed),
        }
    }

    /// Seed fixed for this bubble's lifetime.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seconds from the epoch to `now` (zero before the epoch).
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.epoch).as_secs_f32()
    }

    /// Mode machine, for inspection.
    #[must_use]
    pub fn state(&self) -> &BubbleStateMachine {
        &self.state
    }

    /// Mode currently rendered.
    #[must_use]
    pub fn displayed_mode(&self) -> BubbleMode {
        self.state.displayed()
    }

    /// Request `mode` at `now`. Pending follow-ups of the previous
    /// transition are canceled. Returns false if already requested.
    pub fn set_mode(&mut self, mode: BubbleMode, now: Instant) -> bool {
        let t = self.elapsed(now);
        self.state.request(mode, t)
    }

    /// Advance to `now` and derive the frame for `inputs`.
    pub fn tick(&mut self, now: Instant, inputs: &FrameInputs) -> BubbleFrame {
        let t = self.elapsed(now);
        let _ = self.state.advance(t);
        if inputs.mode != self.state.requested() {
            let _ = self.state.request(inputs.mode, t);
        }
        self.animator.frame(t, inputs, &self.state)
    }

    /// Cancel all pending follow-ups. Returns how many were dropped.
    pub fn cancel_pending(&mut self) -> usize {
        self.state.cancel_pending()
    }
}

impl Drop for ThoughtBubble {
    fn drop(&mut self) {
        let canceled = self.state.cancel_pending();
        if canceled > 0 {
            log::trace!("bubble dropped with {canceled} follow-ups pending");
        }
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;

    fn at(epoch: Instant, seconds: f32) -> Instant {
        epoch + Duration::from_secs_f32(seconds)
    }

    fn bubble() -> (ThoughtBubble, Instant) {
        let epoch = Instant::now();
        (ThoughtBubble::with_epoch(BubbleOptions::default(), 7, epoch), epoch)
    }

    #[test]
    fn test_tick_reports_elapsed_time() {
        let (mut bubble, epoch) = bubble();
        let inputs = FrameInputs::new(150.0, 50.0);
        let frame = bubble.tick(at(epoch, 0.5), &inputs);
        assert!((frame.time - 0.5).abs() < 1e-4);
        assert_eq!(frame.displayed_mode, BubbleMode::Thinking);
        assert!(!frame.indicator_discs.is_empty());
    }

    #[test]
    fn test_mode_change_in_inputs_starts_transition() {
        let (mut bubble, epoch) = bubble();
        let options = BubbleOptions::default();
        let thinking = FrameInputs::new(150.0, 50.0);
        let talking = thinking.clone().with_mode(BubbleMode::Talking);
        let _ = bubble.tick(at(epoch, 0.0), &thinking);

        let frame = bubble.tick(at(epoch, 0.1), &talking);
        assert_eq!(frame.displayed_mode, BubbleMode::Talking);
        assert!(bubble.state().width_locked());

        let done = 0.1 + options.timing.morph + 0.05;
        let frame = bubble.tick(at(epoch, done), &talking);
        assert!(!bubble.state().width_locked());
        assert!(frame.text_layout_included);
        assert!((frame.morph_progress - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_through_read_restores_thinking() {
        let (mut bubble, epoch) = bubble();
        let options = BubbleOptions::default();
        let thinking = FrameInputs::new(150.0, 50.0);
        let read = thinking.clone().with_mode(BubbleMode::Read);
        let before = bubble.tick(at(epoch, 0.0), &thinking);

        let frame = bubble.tick(at(epoch, 0.5), &read);
        assert_eq!(frame.displayed_mode, BubbleMode::Thinking);
        assert!(frame.dissolve_progress.is_some());

        let gone = 0.5 + options.timing.explosion + 0.05;
        let frame = bubble.tick(at(epoch, gone), &read);
        assert_eq!(frame.displayed_mode, BubbleMode::Read);
        assert_eq!(frame.opacity, 0.0);

        let back = gone + 0.5;
        let frame = bubble.tick(at(epoch, back), &thinking);
        assert!(!frame.content_visible);

        let settled = back + options.timing.read_to_thinking + 0.05;
        let after = bubble.tick(at(epoch, settled), &thinking);
        assert_eq!(after.displayed_mode, before.displayed_mode);
        assert_eq!(after.opacity, before.opacity);
        assert_eq!(after.content_visible, before.content_visible);
        assert_eq!(after.morph_progress, before.morph_progress);
        assert_eq!(after.size, before.size);
        assert_eq!(after.track, before.track);
        assert_eq!(after.circles.len(), before.circles.len());
        assert_eq!(bubble.state().pending_follow_ups(), 0);
    }

    #[test]
    fn test_canceled_transition_cannot_flip_later() {
        let (mut bubble, epoch) = bubble();
        let options = BubbleOptions::default();
        let inputs = FrameInputs::new(150.0, 50.0);
        let _ = bubble.tick(at(epoch, 0.0), &inputs);

        assert!(bubble.set_mode(BubbleMode::Read, at(epoch, 0.1)));
        assert_eq!(bubble.cancel_pending(), 1);

        let read = inputs.with_mode(BubbleMode::Read);
        let late = 0.1 + options.timing.explosion * 3.0;
        let frame = bubble.tick(at(epoch, late), &read);
        assert_eq!(frame.displayed_mode, BubbleMode::Thinking);
    }

    #[test]
    fn test_set_mode_same_mode_is_noop() {
        let (mut bubble, epoch) = bubble();
        assert!(!bubble.set_mode(BubbleMode::Thinking, at(epoch, 1.0)));
    }

    #[test]
    fn test_time_before_epoch_clamps_to_zero() {
        let epoch = Instant::now() + Duration::from_secs(5);
        let bubble = ThoughtBubble::with_epoch(BubbleOptions::default(), 1, epoch);
        assert_eq!(bubble.elapsed(Instant::now()), 0.0);
    }
}
