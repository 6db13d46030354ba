//! Separation rules applied to every validation.

use serde::{Deserialize, Serialize};

use crate::error::{DeconflictionError, DeconflictionResult};

pub const DEFAULT_SAFETY_BUFFER: f64 = 5.0;
pub const DEFAULT_SAMPLE_RESOLUTION: f64 = 0.5;

/// Configuration shared by all checks in one validation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum allowed separation distance
    pub safety_buffer: f64,
    /// Time step between compared samples
    pub sample_resolution: f64,
    /// Evaluate scheduled flights on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            safety_buffer: DEFAULT_SAFETY_BUFFER,
            sample_resolution: DEFAULT_SAMPLE_RESOLUTION,
            parallel: false,
        }
    }
}

impl ValidationConfig {
    pub fn new(safety_buffer: f64, sample_resolution: f64) -> Self {
        Self {
            safety_buffer,
            sample_resolution,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject non-positive or non-finite buffer and resolution.
    pub fn validate(&self) -> DeconflictionResult<()> {
        if !self.safety_buffer.is_finite() || self.safety_buffer <= 0.0 {
            return Err(DeconflictionError::InvalidConfiguration(format!(
                "safety buffer must be positive, got {}",
                self.safety_buffer
            )));
        }
        if !self.sample_resolution.is_finite() || self.sample_resolution <= 0.0 {
            return Err(DeconflictionError::InvalidConfiguration(format!(
                "sample resolution must be positive, got {}",
                self.sample_resolution
            )));
        }
        Ok(())
    }
}
