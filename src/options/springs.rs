use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::SpringParams;

/// Springs driving the bubble's size and the read → thinking emergence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Springs", inline)]
#[serde(default)]
pub struct SpringOptions {
    /// Spring for width/height changes.
    pub resize: SpringParams,
    /// Spring shaping the emergence scale.
    pub emergence: SpringParams,
    /// Extra initial velocity per unit of remaining distance at each new
    /// resize target.
    #[schemars(title = "Velocity Boost", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub velocity_boost: f32,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            resize: SpringParams::default(),
            emergence: SpringParams::new(0.55, 0.5),
            velocity_boost: 1.5,
        }
    }
}
