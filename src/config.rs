//! Validation thresholds.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`Limits`] override.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Limits file could not be read.
    #[error("Failed to read limits file: {0}")]
    Io(#[from] std::io::Error),

    /// Limits JSON is malformed.
    #[error("Invalid limits JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Limits are internally inconsistent.
    #[error("Invalid limits: {0}")]
    Invalid(String),
}

/// Thresholds used by the phase validators.
///
/// `Limits::default()` is the standard rule set. Partial JSON overrides
/// keep defaults for every key they omit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Outlines longer than this are checked in compact mode.
    pub compact_threshold: usize,
    /// Rise between adjacent outline intensities that is flagged.
    pub max_intensity_jump: f64,
    pub intensity_min: f64,
    pub intensity_max: f64,
    /// Bubble cap per scene.
    pub max_bubbles: usize,
    /// Non-empty descriptions shorter than this are flagged.
    pub min_description_chars: usize,
    /// Distinct contaminating runs quoted in one report.
    pub contamination_samples: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            compact_threshold: 12,
            max_intensity_jump: 3.0,
            intensity_min: 1.0,
            intensity_max: 5.0,
            max_bubbles: 3,
            min_description_chars: 10,
            contamination_samples: 3,
        }
    }
}

impl Limits {
    /// Parses a (possibly partial) JSON override.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let limits: Limits = serde_json::from_str(json)?;
        limits.check()?;
        Ok(limits)
    }

    /// Reads a JSON override from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builder: Set the compact-mode threshold.
    pub fn with_compact_threshold(mut self, threshold: usize) -> Self {
        self.compact_threshold = threshold;
        self
    }

    /// Builder: Set the bubble cap.
    pub fn with_max_bubbles(mut self, max: usize) -> Self {
        self.max_bubbles = max;
        self
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.intensity_min > self.intensity_max {
            return Err(ConfigError::Invalid(format!(
                "intensity_min {} exceeds intensity_max {}",
                self.intensity_min, self.intensity_max
            )));
        }
        if self.max_intensity_jump <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_intensity_jump must be positive".to_string(),
            ));
        }
        if self.contamination_samples == 0 {
            return Err(ConfigError::Invalid(
                "contamination_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
