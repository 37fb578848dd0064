use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single timestamped power reading from an optimizer or system meter.
///
/// Timestamps are local wall-clock time as reported by the telemetry export.
/// `power_watts` is expected to be non-negative but is not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub power_watts: f64,
    pub device_id: Option<String>,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, power_watts: f64) -> Self {
        Reading {
            timestamp,
            power_watts,
            device_id: None,
        }
    }

    /// Tag the reading with the device it came from.
    pub fn with_device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_string());
        self
    }
}

/// Anything that can stand in for a point on a power curve.
///
/// Implemented by raw [`Reading`]s and by aggregated buckets so the efficiency
/// analyzer can run over either.
pub trait PowerSample {
    fn timestamp(&self) -> NaiveDateTime;

    /// Representative power for the sample.
    fn power_watts(&self) -> f64;

    /// Highest power observed within the sample. Defaults to [`PowerSample::power_watts`].
    fn peak_watts(&self) -> f64 {
        self.power_watts()
    }
}

impl PowerSample for Reading {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn power_watts(&self) -> f64 {
        self.power_watts
    }
}
