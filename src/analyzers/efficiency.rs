//! System efficiency over productive (daylight) hours.

use tracing::{debug, warn};

use crate::analyzers::types::EfficiencyReport;
use crate::analyzers::utility::{max, mean, pct};
use crate::config::{AnalysisConfig, DEFAULT_WINDOW_MINUTES};
use crate::error::{AnalysisError, Outcome};
use crate::reading::PowerSample;

/// Computes peak, average and capacity figures against `rated_power_watts`.
///
/// Only samples whose time of day lies in the configured productive window
/// contribute, so night-time noise never inflates the peak. Works on raw
/// readings or on aggregated buckets; for buckets the peak uses each bucket's
/// maximum.
///
/// Missing or non-positive rated power, no samples, or no daylight samples all
/// yield [`Outcome::InsufficientData`].
///
/// # Errors
///
/// Returns an [`AnalysisError`] when the efficiency settings in `config` are invalid.
pub fn analyze_efficiency<S: PowerSample>(
    samples: &[S],
    rated_power_watts: Option<f64>,
    config: &AnalysisConfig,
) -> Result<Outcome<EfficiencyReport>, AnalysisError> {
    config.validate_efficiency()?;

    let rated = match rated_power_watts {
        Some(rated) if rated.is_finite() && rated > 0.0 => rated,
        other => {
            warn!(rated_power_watts = ?other, "Rated power unavailable");
            return Ok(Outcome::insufficient("rated power is missing or zero"));
        }
    };

    if samples.is_empty() {
        warn!("No readings to analyze");
        return Ok(Outcome::insufficient("no readings in analysis period"));
    }

    let daylight: Vec<&S> = samples
        .iter()
        .filter(|s| config.is_daylight(s.timestamp().time()))
        .collect();

    if daylight.is_empty() {
        warn!(samples = samples.len(), "No readings within productive hours");
        return Ok(Outcome::insufficient(format!(
            "no readings between {} and {}",
            config.daylight_start.format("%H:%M"),
            config.daylight_end.format("%H:%M")
        )));
    }

    let interval_minutes = sample_interval_minutes(samples, config);
    let interval_hours = interval_minutes / 60.0;
    let days = config.analysis_period_days as f64;

    let powers: Vec<f64> = daylight
        .iter()
        .map(|s| non_negative(s.power_watts()))
        .collect();
    let peak = max(daylight.iter().map(|s| non_negative(s.peak_watts()))).unwrap_or(0.0);
    let avg = mean(&powers);

    let productive = powers
        .iter()
        .filter(|p| **p > config.productivity_floor_watts)
        .count();

    let daylight_hours_per_day = hours_per_day(daylight.len(), interval_hours, days);
    let productive_hours_per_day = hours_per_day(productive, interval_hours, days);
    let avg_efficiency_pct = pct(avg, rated);

    debug!(
        samples = samples.len(),
        daylight = daylight.len(),
        productive,
        interval_minutes,
        "Efficiency inputs"
    );

    Ok(Outcome::Ready(EfficiencyReport {
        rated_power_watts: rated,
        peak_power_watts: peak,
        peak_efficiency_pct: pct(peak, rated),
        avg_power_daylight_watts: avg,
        avg_efficiency_pct,
        capacity_factor_pct: avg_efficiency_pct * daylight_hours_per_day / 24.0,
        productive_hours_per_day,
        daylight_hours_per_day,
        analysis_period_days: config.analysis_period_days,
        sample_interval_minutes: interval_minutes,
    }))
}

/// Duration each sample stands for.
///
/// Uses the configured interval when set, otherwise the median positive gap
/// between consecutive samples, otherwise the default window width.
pub fn sample_interval_minutes<S: PowerSample>(samples: &[S], config: &AnalysisConfig) -> f64 {
    if let Some(minutes) = config.sample_interval_minutes {
        return minutes as f64;
    }

    let mut timestamps: Vec<_> = samples.iter().map(|s| s.timestamp()).collect();
    timestamps.sort();

    let mut gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 60.0)
        .filter(|gap| *gap > 0.0)
        .collect();

    if gaps.is_empty() {
        return DEFAULT_WINDOW_MINUTES as f64;
    }

    gaps.sort_by(f64::total_cmp);
    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2.0
    } else {
        gaps[mid]
    }
}

/// Converts a sample count to hours per day, capped at 24.
fn hours_per_day(count: usize, interval_hours: f64, days: f64) -> f64 {
    let hours = count as f64 * interval_hours / days;
    if hours > 24.0 {
        warn!(
            hours_per_day = hours,
            analysis_period_days = days,
            "More than 24 hours of samples per day, check analysis period; capping at 24"
        );
        return 24.0;
    }
    hours
}

/// Negative or NaN telemetry noise counts as zero output.
fn non_negative(power: f64) -> f64 {
    if power > 0.0 { power } else { 0.0 }
}
