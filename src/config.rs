//! Analysis settings with their documented defaults.
//!
//! Stored as a plain JSON object on disk; every key is optional:
//! ```json
//! {
//!   "window_minutes": 15,
//!   "daylight_start": "06:00:00",
//!   "daylight_end": "20:00:00",
//!   "productivity_floor_watts": 50.0,
//!   "threshold_percent": 85.0,
//!   "analysis_period_days": 14,
//!   "sample_interval_minutes": null
//! }
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub const DEFAULT_WINDOW_MINUTES: u32 = 15;
pub const DEFAULT_PRODUCTIVITY_FLOOR_WATTS: f64 = 50.0;
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Aggregation window width.
    pub window_minutes: u32,
    /// Inclusive start of productive hours.
    pub daylight_start: NaiveTime,
    /// Exclusive end of productive hours.
    pub daylight_end: NaiveTime,
    pub productivity_floor_watts: f64,
    /// Panels whose relative efficiency is below this are flagged.
    pub threshold_percent: f64,
    pub analysis_period_days: u32,
    /// Duration represented by one sample. Inferred from the data when unset.
    pub sample_interval_minutes: Option<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            daylight_start: hm(6, 0),
            daylight_end: hm(20, 0),
            productivity_floor_watts: DEFAULT_PRODUCTIVITY_FLOOR_WATTS,
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            analysis_period_days: 1,
            sample_interval_minutes: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path` and validates it.
    pub fn load(path: &str) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every setting.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_window(self.window_minutes)?;
        self.validate_efficiency()?;
        validate_threshold(self.threshold_percent)
    }

    /// Checks the settings used by the efficiency analyzer.
    pub fn validate_efficiency(&self) -> Result<(), AnalysisError> {
        if self.daylight_end <= self.daylight_start {
            return Err(AnalysisError::InvalidDaylightWindow {
                start: self.daylight_start.format("%H:%M").to_string(),
                end: self.daylight_end.format("%H:%M").to_string(),
            });
        }
        if self.analysis_period_days == 0 {
            return Err(AnalysisError::InvalidPeriod(self.analysis_period_days));
        }
        if !self.productivity_floor_watts.is_finite() || self.productivity_floor_watts < 0.0 {
            return Err(AnalysisError::InvalidFloor(self.productivity_floor_watts));
        }
        if self.sample_interval_minutes == Some(0) {
            return Err(AnalysisError::InvalidSampleInterval(0));
        }
        Ok(())
    }

    /// Whether a time of day falls within productive hours.
    pub fn is_daylight(&self, time: NaiveTime) -> bool {
        time >= self.daylight_start && time < self.daylight_end
    }
}

/// Window sizes must tile an hour evenly so every bucket has the same width.
pub fn validate_window(window_minutes: u32) -> Result<(), AnalysisError> {
    if window_minutes == 0 || 60 % window_minutes != 0 {
        return Err(AnalysisError::InvalidWindow(window_minutes));
    }
    Ok(())
}

pub fn validate_threshold(threshold_percent: f64) -> Result<(), AnalysisError> {
    if !(0.0..=100.0).contains(&threshold_percent) {
        return Err(AnalysisError::InvalidThreshold(threshold_percent));
    }
    Ok(())
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}
