use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::DiameterBounds;

/// Bubble shape and circle sizing, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
pub struct GeometryOptions {
    /// Smallest perimeter circle diameter.
    #[schemars(title = "Min Diameter", range(min = 1.0, max = 64.0), extend("step" = 0.5))]
    pub min_diameter: f32,
    /// Largest perimeter circle diameter.
    #[schemars(title = "Max Diameter", range(min = 1.0, max = 64.0), extend("step" = 0.5))]
    pub max_diameter: f32,
    /// Blur applied before the alpha threshold (metaball softness).
    #[schemars(title = "Blur Radius", range(min = 0.0, max = 16.0), extend("step" = 0.5))]
    pub blur_radius: f32,
    /// Corner radius of the bubble rectangle.
    #[schemars(title = "Corner Radius", range(min = 0.0, max = 64.0), extend("step" = 1.0))]
    pub corner_radius: f32,
    /// Height of one line of text; the bubble is pinned to it while the
    /// talking morph runs.
    #[schemars(skip)]
    pub single_line_height: f32,
}

impl GeometryOptions {
    /// Diameter bounds as given (not normalized).
    #[must_use]
    pub fn bounds(&self) -> DiameterBounds {
        DiameterBounds::new(self.min_diameter, self.max_diameter)
    }
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            min_diameter: 14.0,
            max_diameter: 24.0,
            blur_radius: 4.0,
            corner_radius: 18.0,
            single_line_height: 36.0,
        }
    }
}
