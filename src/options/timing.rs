use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Durations (seconds) of the bubble's mode transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Timing", inline)]
#[serde(default)]
pub struct TimingOptions {
    /// Thinking ↔ talking morph.
    #[schemars(title = "Morph", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub morph: f32,
    /// Easing of one circle's diameter toward a new target.
    #[schemars(title = "Circle Transition", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub circle_transition: f32,
    /// Elapsed time after which a resize spring reports its target exactly.
    #[schemars(title = "Resize Cutoff", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub resize_cutoff: f32,
    /// How long morph progress stays frozen while the dissolve plays.
    #[schemars(title = "Explosion", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub explosion: f32,
    /// Length of the read → thinking emergence.
    #[schemars(title = "Read To Thinking", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub read_to_thinking: f32,
    /// Delay before the displayed mode flips on read → talking.
    #[schemars(skip)]
    pub mode_flip_delay: f32,
}

impl TimingOptions {
    /// Every duration paired with its name, for validation messages.
    pub(crate) fn named(&self) -> [(&'static str, f32); 6] {
        [
            ("morph", self.morph),
            ("circle_transition", self.circle_transition),
            ("resize_cutoff", self.resize_cutoff),
            ("explosion", self.explosion),
            ("read_to_thinking", self.read_to_thinking),
            ("mode_flip_delay", self.mode_flip_delay),
        ]
    }
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            morph: 0.45,
            circle_transition: 0.3,
            resize_cutoff: 1.2,
            explosion: 0.5,
            read_to_thinking: 0.6,
            mode_flip_delay: 0.02,
        }
    }
}
