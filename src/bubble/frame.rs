//! Per-frame inputs and the derived values handed to the renderer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mode::{BubbleMode, MessageType};
use crate::geometry::{Disc, RoundedRect};
use crate::options::GeometryOptions;

/// Fill used instead of the caller's color while the diameter packing is
/// flagged invalid, so broken inputs stand out.
pub const INVALID_PACKING_FILL: [f32; 4] = [1.0, 0.0, 0.55, 1.0];

/// What the owner supplies each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs {
    /// Target bubble width.
    pub width: f32,
    /// Target bubble height.
    pub height: f32,
    /// Corner radius, diameter bounds and blur.
    pub geometry: GeometryOptions,
    /// Bubble color (linear RGBA).
    pub fill: [f32; 4],
    /// Requested mode; a change starts a transition.
    pub mode: BubbleMode,
    /// Tail side.
    pub message_type: MessageType,
}

impl FrameInputs {
    /// Inputs for a `width × height` thinking bubble with default geometry.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            geometry: GeometryOptions::default(),
            fill: [0.91, 0.91, 0.93, 1.0],
            mode: BubbleMode::Thinking,
            message_type: MessageType::Incoming,
        }
    }

    /// Same inputs with `mode` requested.
    #[must_use]
    pub fn with_mode(mut self, mode: BubbleMode) -> Self {
        self.mode = mode;
        self
    }
}

/// One circle to draw, in bubble-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderCircle {
    /// Stable identity across frames.
    pub id: u64,
    /// Center point.
    pub center: Vec2,
    /// Diameter.
    pub diameter: f32,
    /// Whether the circle is shrinking away.
    pub is_disappearing: bool,
}

/// Everything the renderer needs for one frame. Coordinates are relative
/// to the bubble's top-left corner, y down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleFrame {
    /// Seconds since the bubble's epoch.
    pub time: f32,
    /// Animated bubble size.
    pub size: Vec2,
    /// Rectangle the circle train runs along; also the filled body.
    pub track: RoundedRect,
    /// Perimeter circles, train order, disappearing ones last.
    pub circles: Vec<RenderCircle>,
    /// Thinking indicator discs (absolute centers).
    pub indicator_discs: Vec<Disc>,
    /// Blur radius for the metaball filter.
    pub blur_radius: f32,
    /// Alpha threshold for the metaball filter.
    pub alpha_threshold: f32,
    /// Fill color, replaced by [`INVALID_PACKING_FILL`] when flagged.
    pub fill: [f32; 4],
    /// Bubble opacity.
    pub opacity: f32,
    /// Thinking (0) to talking (1) morph.
    pub morph_progress: f32,
    /// Whether indicator or text content should be drawn.
    pub content_visible: bool,
    /// Whether text takes part in layout.
    pub text_layout_included: bool,
    /// Mode being rendered.
    pub displayed_mode: BubbleMode,
    /// Progress of the external dissolve effect, while it plays.
    pub dissolve_progress: Option<f32>,
    /// False when the diameter packing had to be corrected.
    pub packing_valid: bool,
}

impl BubbleFrame {
    /// Sum of the train's diameters, disappearing circles excluded.
    #[must_use]
    pub fn train_length(&self) -> f32 {
        self.circles
            .iter()
            .filter(|c| !c.is_disappearing)
            .map(|c| c.diameter)
            .sum()
    }
}
