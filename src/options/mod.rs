//! Tunable bubble options with TOML preset support.
//!
//! Timings, circle geometry, springs and motion constants are consolidated
//! here. Options serialize to/from TOML, and every section uses
//! `#[serde(default)]` so a preset only needs the fields it overrides.

mod geometry;
mod motion;
mod springs;
mod timing;

use std::path::Path;

pub use geometry::GeometryOptions;
pub use motion::MotionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use springs::SpringOptions;
pub use timing::TimingOptions;

use crate::animation::SpringParams;
use crate::error::BubbleError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct BubbleOptions {
    /// Transition durations.
    pub timing: TimingOptions,
    /// Shape and circle sizing.
    pub geometry: GeometryOptions,
    /// Resize and emergence springs.
    pub springs: SpringOptions,
    /// Train revolution, oscillation and indicator cluster.
    pub motion: MotionOptions,
}

impl BubbleOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(BubbleOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, BubbleError> {
        let content =
            std::fs::read_to_string(path).map_err(BubbleError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| BubbleError::OptionsParse(e.to_string()))?;
        options.validate()?;
        log::debug!("loaded bubble options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), BubbleError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BubbleError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(BubbleError::Io)?;
        }
        std::fs::write(path, content).map_err(BubbleError::Io)
    }

    /// Reject values the animation cannot run with.
    ///
    /// Inverted diameter bounds are not rejected here; the packer corrects
    /// them and flags the packing invalid.
    pub fn validate(&self) -> Result<(), BubbleError> {
        for (name, value) in self.timing.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "timing.{name} must be a non-negative duration, got {value}"
                )));
            }
        }

        let g = &self.geometry;
        let non_negative = [
            ("geometry.min_diameter", g.min_diameter),
            ("geometry.max_diameter", g.max_diameter),
            ("geometry.blur_radius", g.blur_radius),
            ("geometry.corner_radius", g.corner_radius),
            ("motion.oscillation_amplitude", self.motion.oscillation_amplitude),
            ("motion.target_drift_tolerance", self.motion.target_drift_tolerance),
            ("motion.indicator_spacing", self.motion.indicator_spacing),
            ("springs.velocity_boost", self.springs.velocity_boost),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let positive = [
            ("geometry.single_line_height", g.single_line_height),
            ("motion.revolution_period", self.motion.revolution_period),
            ("motion.oscillation_period", self.motion.oscillation_period),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.motion.alpha_threshold) {
            return Err(invalid(format!(
                "motion.alpha_threshold must lie in [0, 1], got {}",
                self.motion.alpha_threshold
            )));
        }

        validate_spring("springs.resize", self.springs.resize)?;
        validate_spring("springs.emergence", self.springs.emergence)
    }
}

fn validate_spring(name: &str, params: SpringParams) -> Result<(), BubbleError> {
    if !params.response.is_finite() || params.response <= 0.0 {
        return Err(invalid(format!(
            "{name}.response must be positive, got {}",
            params.response
        )));
    }
    if !params.damping_ratio.is_finite() || params.damping_ratio < 0.0 {
        return Err(invalid(format!(
            "{name}.damping_ratio must be non-negative, got {}",
            params.damping_ratio
        )));
    }
    Ok(())
}

fn invalid(message: String) -> BubbleError {
    BubbleError::InvalidOptions(message)
}
