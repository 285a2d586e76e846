use serde::{Deserialize, Serialize};

use crate::domain::benchmark::{FrameBudget, RefreshRate};
use crate::domain::errors::{ValidationError, ValidationResult};

/// Tunables for a benchmark session. Every field has a default, so a partial
/// JSON object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Frames measured per sample.
    pub iterations_per_sample: u32,
    pub jitter_tolerance: f64,
    /// timeout = drop limit * factor
    pub timeout_factor: f64,
    /// Pause between workload sets.
    pub settle_delay_ms: u32,
    /// Wall-clock window used to count frames when detecting the refresh rate.
    pub detection_window_ms: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub image_url: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations_per_sample: FrameBudget::DEFAULT_ITERATIONS,
            jitter_tolerance: FrameBudget::DEFAULT_JITTER_TOLERANCE,
            timeout_factor: FrameBudget::DEFAULT_TIMEOUT_FACTOR,
            settle_delay_ms: 2000,
            detection_window_ms: 1000.0,
            canvas_width: 1920,
            canvas_height: 1080,
            image_url: "assets/img.png".to_string(),
        }
    }
}

impl BenchConfig {
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::InvalidConfig(format!("malformed JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.iterations_per_sample == 0 {
            return Err(ValidationError::InvalidConfig(
                "iterations_per_sample must be at least 1".to_string(),
            ));
        }
        if !(self.jitter_tolerance.is_finite() && self.jitter_tolerance > 0.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "jitter_tolerance must be positive, got {}",
                self.jitter_tolerance
            )));
        }
        if !(self.timeout_factor.is_finite() && self.timeout_factor >= 1.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "timeout_factor must be >= 1, got {}",
                self.timeout_factor
            )));
        }
        if !(self.detection_window_ms.is_finite() && self.detection_window_ms > 0.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "detection_window_ms must be positive, got {}",
                self.detection_window_ms
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ValidationError::InvalidConfig(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    pub fn frame_budget(&self, rate: RefreshRate) -> FrameBudget {
        FrameBudget::new(
            rate,
            self.iterations_per_sample,
            self.jitter_tolerance,
            self.timeout_factor,
        )
    }
}
