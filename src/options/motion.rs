use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Continuous motion of the circle train and the indicator cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Motion", inline)]
#[serde(default)]
pub struct MotionOptions {
    /// Seconds for the train to travel once around the track.
    #[schemars(title = "Revolution Period", range(min = 1.0, max = 60.0), extend("step" = 0.5))]
    pub revolution_period: f32,
    /// Seconds per breathing cycle of the circle sizes.
    #[schemars(title = "Oscillation Period", range(min = 0.5, max = 10.0), extend("step" = 0.1))]
    pub oscillation_period: f32,
    /// Peak diameter swing of each circle.
    #[schemars(title = "Oscillation Amplitude", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub oscillation_amplitude: f32,
    /// Drift past which a new circle transition starts.
    #[schemars(skip)]
    pub target_drift_tolerance: f32,
    /// Discs in the thinking indicator cluster.
    #[schemars(title = "Indicator Discs", range(min = 0, max = 12))]
    pub indicator_disc_count: usize,
    /// Gap between indicator discs.
    #[schemars(skip)]
    pub indicator_spacing: f32,
    /// Alpha threshold handed to the metaball compositing filter.
    #[schemars(title = "Alpha Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub alpha_threshold: f32,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            revolution_period: 10.0,
            oscillation_period: 3.0,
            oscillation_amplitude: 2.5,
            target_drift_tolerance: 0.5,
            indicator_disc_count: 3,
            indicator_spacing: 2.0,
            alpha_threshold: 0.5,
        }
    }
}
