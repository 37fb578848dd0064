//! Data types produced by the analysis pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::analyzers::grade::Rating;
use crate::reading::PowerSample;

/// Summary of every reading that fell into one fixed-width window.
///
/// Only occupied windows are ever emitted, so `sample_count >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub window_start: NaiveDateTime,
    pub avg_power: f64,
    pub max_power: f64,
    pub min_power: f64,
    pub sample_count: u32,
}

impl PowerSample for AggregateBucket {
    fn timestamp(&self) -> NaiveDateTime {
        self.window_start
    }

    fn power_watts(&self) -> f64 {
        self.avg_power
    }

    fn peak_watts(&self) -> f64 {
        self.max_power
    }
}

/// System efficiency over productive hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyReport {
    pub rated_power_watts: f64,
    pub peak_power_watts: f64,
    pub peak_efficiency_pct: f64,
    pub avg_power_daylight_watts: f64,
    pub avg_efficiency_pct: f64,
    /// Delivered power as a share of rating across all hours, night included.
    pub capacity_factor_pct: f64,
    pub productive_hours_per_day: f64,
    pub daylight_hours_per_day: f64,
    pub analysis_period_days: u32,
    /// Duration each sample was taken to represent.
    pub sample_interval_minutes: f64,
}

impl EfficiencyReport {
    pub fn rating(&self) -> Rating {
        Rating::from_efficiency(self.avg_efficiency_pct)
    }
}

/// Per-panel statistics normalised against the best panel in the cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSummary {
    pub panel_id: String,
    pub mean_power_watts: f64,
    pub max_power_watts: f64,
    pub stddev_power_watts: f64,
    /// `100 * mean / best mean in cohort`.
    pub efficiency_pct: f64,
}

/// First-to-last change in bucket average power.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerTrend {
    pub start: NaiveDateTime,
    pub start_power: f64,
    pub end: NaiveDateTime,
    pub end_power: f64,
    pub change_watts: f64,
}

/// Headline figures for a run of aggregated buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalSummary {
    pub total_buckets: usize,
    pub peak_power_watts: f64,
    pub peak_window: NaiveDateTime,
    pub min_power_watts: f64,
    pub avg_power_watts: f64,
    pub energy_kwh: f64,
    pub productive_buckets: usize,
    pub productive_hours: f64,
    pub low_buckets: usize,
    pub trend: Option<PowerTrend>,
}

/// Estimated energy produced on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEnergy {
    pub date: NaiveDate,
    pub energy_kwh: f64,
}
