//! Bubble modes and tail placement.

use std::f32::consts::{FRAC_PI_4, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the bubble is showing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BubbleMode {
    /// Retracted cloud of circles with the indicator cluster.
    #[default]
    Thinking,
    /// Expanded rounded rectangle holding message text.
    Talking,
    /// Hidden; the message has been read.
    Read,
}

impl BubbleMode {
    /// Lowercase name, as used in logs and serialized frames.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thinking => "thinking",
            Self::Talking => "talking",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for BubbleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BubbleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thinking" => Ok(Self::Thinking),
            "talking" => Ok(Self::Talking),
            "read" => Ok(Self::Read),
            other => Err(format!("unknown bubble mode: {other}")),
        }
    }
}

/// Sub-animations that temporarily override the normal morph blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransientAnimation {
    /// Uniform scale-up from the center while leaving read.
    ReadToThinking,
    /// Morph frozen while an external dissolve plays.
    ThinkingToReadExplosion,
}

/// Which side the bubble's tail sits on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// From the other party; tail at the bottom-left.
    #[default]
    Incoming,
    /// From the local user; tail at the bottom-right.
    Outgoing,
}

impl MessageType {
    /// Angle (radians, y down) from the bubble center toward the tail
    /// corner. The indicator's anchor disc is pinned along it.
    #[must_use]
    pub fn tail_angle(self) -> f32 {
        match self {
            Self::Incoming => PI - FRAC_PI_4,
            Self::Outgoing => FRAC_PI_4,
        }
    }
}
