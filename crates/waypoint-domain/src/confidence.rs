//! Confidence value module

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence in a fact, always within [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence at all
    pub const ZERO: Confidence = Confidence(0.0);

    /// Full confidence
    pub const FULL: Confidence = Confidence(1.0);

    /// Create a new confidence value
    ///
    /// # Panics
    /// Panics if the value is outside [0, 1] or NaN
    pub fn new(value: f64) -> Self {
        assert!((0.0..=1.0).contains(&value), "Confidence must be in [0, 1]");
        Self(value)
    }

    /// Create a confidence value, clamping into [0, 1] (NaN becomes 0)
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the value meets an inclusive threshold
    pub fn meets(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
