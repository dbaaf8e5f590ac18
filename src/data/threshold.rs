//! Alert threshold and alert evaluation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Lowest accepted threshold in bpm.
pub const MIN_THRESHOLD: f64 = 1.0;
/// Highest accepted threshold in bpm.
pub const MAX_THRESHOLD: f64 = 300.0;
/// Threshold used until the user sets one.
pub const DEFAULT_THRESHOLD: f64 = 150.0;

/// Errors produced when parsing threshold input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("threshold is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{value} bpm is outside {min}-{max} bpm")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Heart rate above which an alert is raised.
///
/// Always finite and within [`MIN_THRESHOLD`]..=[`MAX_THRESHOLD`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl Threshold {
    /// Build a threshold from a bpm value.
    pub fn new(bpm: f64) -> Result<Self, ThresholdError> {
        if !bpm.is_finite() {
            return Err(ThresholdError::NotANumber(bpm.to_string()));
        }
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&bpm) {
            return Err(ThresholdError::OutOfRange {
                value: bpm,
                min: MIN_THRESHOLD,
                max: MAX_THRESHOLD,
            });
        }
        Ok(Self(bpm))
    }

    /// Parse user input such as "150" or "142.5".
    pub fn parse(input: &str) -> Result<Self, ThresholdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ThresholdError::Empty);
        }
        let bpm: f64 = input
            .parse()
            .map_err(|_| ThresholdError::NotANumber(input.to_string()))?;
        Self::new(bpm)
    }

    pub fn bpm(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of comparing a reading against the threshold in effect when it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertState {
    pub value: f64,
    pub threshold: Threshold,
    pub exceeded: bool,
}

impl AlertState {
    pub fn evaluate(value: f64, threshold: Threshold) -> Self {
        Self {
            value,
            threshold,
            exceeded: value > threshold.bpm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(Threshold::default().bpm(), 150.0);
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(Threshold::parse("120").unwrap().bpm(), 120.0);
        assert_eq!(Threshold::parse(" 142.5 ").unwrap().bpm(), 142.5);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Threshold::parse(""), Err(ThresholdError::Empty));
        assert_eq!(Threshold::parse("   "), Err(ThresholdError::Empty));
        assert_eq!(
            Threshold::parse("abc"),
            Err(ThresholdError::NotANumber("abc".to_string()))
        );
        assert!(matches!(Threshold::parse("NaN"), Err(ThresholdError::NotANumber(_))));
        assert!(matches!(Threshold::parse("-5"), Err(ThresholdError::OutOfRange { .. })));
        assert!(matches!(Threshold::parse("0"), Err(ThresholdError::OutOfRange { .. })));
        assert!(matches!(Threshold::parse("301"), Err(ThresholdError::OutOfRange { .. })));
    }

    #[test]
    fn test_error_messages() {
        let err = Threshold::parse("400").unwrap_err();
        assert_eq!(err.to_string(), "400 bpm is outside 1-300 bpm");
    }

    #[test]
    fn test_alert_is_strictly_greater() {
        let threshold = Threshold::new(150.0).unwrap();
        assert!(!AlertState::evaluate(150.0, threshold).exceeded);
        assert!(AlertState::evaluate(150.5, threshold).exceeded);
        assert!(!AlertState::evaluate(90.0, threshold).exceeded);
    }
}
