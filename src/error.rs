//! Configuration errors
//!
//! The running engine has no error surface: a missing container, a missing 2D
//! context or a zero-sized viewport simply leaves an effect dark. Only loading
//! and validating `Settings` can fail, and callers fall back to defaults.

use thiserror::Error;

/// Errors raised when parsing or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
    /// A probability field fell outside [0, 1].
    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f32 },
    /// A size, interval or duration was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    /// A `[min, max)` range had `min > max`.
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}
