//! Acceptance thresholds shared by the scorer and the practice flow

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Similarity a transcription must strictly exceed to be marked correct.
pub const STRICT_CORRECT_THRESHOLD: f64 = 0.8;

/// Similarity above which the practice flow still advances an incorrect attempt.
pub const LENIENT_ACCEPT_THRESHOLD: f64 = 0.7;

/// The two acceptance bars. They are deliberately kept separate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Bar for the scorer's own `is_correct` verdict
    pub strict_correct: f64,
    /// Bar the practice flow applies on top of the returned similarity
    pub lenient_accept: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strict_correct: STRICT_CORRECT_THRESHOLD,
            lenient_accept: LENIENT_ACCEPT_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn with_strict_correct(mut self, value: f64) -> Self {
        self.strict_correct = value;
        self
    }

    pub fn with_lenient_accept(mut self, value: f64) -> Self {
        self.lenient_accept = value;
        self
    }

    /// Parse thresholds from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let thresholds: Thresholds = serde_json::from_str(json)?;
        thresholds.validate()?;
        debug!(
            strict_correct = thresholds.strict_correct,
            lenient_accept = thresholds.lenient_accept,
            "Loaded thresholds"
        );
        Ok(thresholds)
    }

    /// Both values must lie in `0.0..=1.0`, the range of a similarity score.
    pub fn validate(&self) -> Result<()> {
        check_unit_range("strict_correct", self.strict_correct)?;
        check_unit_range("lenient_accept", self.lenient_accept)
    }
}

fn check_unit_range(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidThreshold { name, value })
    }
}
