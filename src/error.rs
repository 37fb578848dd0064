//! Error and outcome types shared by every analysis stage.

use thiserror::Error;

/// Configuration misuse detected at call time.
///
/// Data-quality problems never surface here; they are absorbed by the parser
/// or reported as [`Outcome::InsufficientData`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid window size: {0} minutes (must be a divisor of 60)")]
    InvalidWindow(u32),

    #[error("Invalid daylight window: end {end} is not after start {start}")]
    InvalidDaylightWindow { start: String, end: String },

    #[error("Invalid analysis period: {0} days (must be at least 1)")]
    InvalidPeriod(u32),

    #[error("Invalid threshold: {0}% (must be between 0 and 100)")]
    InvalidThreshold(f64),

    #[error("Invalid productivity floor: {0} W (must be finite and non-negative)")]
    InvalidFloor(f64),

    #[error("Invalid sample interval: {0} minutes (must be positive)")]
    InvalidSampleInterval(u32),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of an analysis that ran with valid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    /// Not enough qualifying data to compute anything meaningful.
    InsufficientData { reason: String },
}

impl<T> Outcome<T> {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Outcome::InsufficientData {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    /// Returns the value, or `None` when data was insufficient.
    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::InsufficientData { .. } => None,
        }
    }

    /// The reason carried by an insufficient-data outcome.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::InsufficientData { reason } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ready(value) => Outcome::Ready(f(value)),
            Outcome::InsufficientData { reason } => Outcome::InsufficientData { reason },
        }
    }
}
