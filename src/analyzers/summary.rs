use std::collections::BTreeMap;

use crate::analyzers::types::{AggregateBucket, DailyEnergy, IntervalSummary, PowerTrend};
use crate::analyzers::utility::{mean, min};
use crate::config::validate_window;
use crate::error::{AnalysisError, Outcome};

/// Headline figures over a run of buckets of width `window_minutes`.
///
/// Energy assumes each bucket's average held for the whole window. Buckets
/// whose average exceeds `productivity_floor_watts` count as productive.
pub fn summarize_intervals(
    buckets: &[AggregateBucket],
    window_minutes: u32,
    productivity_floor_watts: f64,
) -> Result<Outcome<IntervalSummary>, AnalysisError> {
    validate_window(window_minutes)?;

    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return Ok(Outcome::insufficient("no aggregated buckets"));
    };

    let window_hours = window_minutes as f64 / 60.0;
    let averages: Vec<f64> = buckets.iter().map(|b| b.avg_power).collect();

    let peak = buckets
        .iter()
        .fold(first, |best, b| if b.max_power > best.max_power { b } else { best });
    let min_power = min(buckets.iter().map(|b| b.min_power)).unwrap_or(first.min_power);

    let productive_buckets = buckets
        .iter()
        .filter(|b| b.avg_power > productivity_floor_watts)
        .count();

    let trend = (buckets.len() >= 2).then(|| PowerTrend {
        start: first.window_start,
        start_power: first.avg_power,
        end: last.window_start,
        end_power: last.avg_power,
        change_watts: last.avg_power - first.avg_power,
    });

    Ok(Outcome::Ready(IntervalSummary {
        total_buckets: buckets.len(),
        peak_power_watts: peak.max_power,
        peak_window: peak.window_start,
        min_power_watts: min_power,
        avg_power_watts: mean(&averages),
        energy_kwh: averages.iter().sum::<f64>() * window_hours / 1000.0,
        productive_buckets,
        productive_hours: productive_buckets as f64 * window_hours,
        low_buckets: buckets.len() - productive_buckets,
        trend,
    }))
}

/// Estimated kWh per calendar date, oldest first.
pub fn daily_energy(
    buckets: &[AggregateBucket],
    window_minutes: u32,
) -> Result<Vec<DailyEnergy>, AnalysisError> {
    validate_window(window_minutes)?;

    let window_hours = window_minutes as f64 / 60.0;
    let mut totals = BTreeMap::new();
    for b in buckets {
        *totals.entry(b.window_start.date()).or_insert(0.0) += b.avg_power * window_hours / 1000.0;
    }

    Ok(totals
        .into_iter()
        .map(|(date, energy_kwh)| DailyEnergy { date, energy_kwh })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    #[test]
    fn test_summary_figures() {
        let buckets = vec![
            bucket(1, 8, 0, 40.0, 60.0, 20.0),
            bucket(1, 8, 15, 2000.0, 2600.0, 1500.0),
            bucket(1, 8, 30, 1000.0, 1200.0, 900.0),
        ];

        let summary = summarize_intervals(&buckets, 15, 50.0)
            .unwrap()
            .ready()
            .unwrap();

        assert_eq!(summary.total_buckets, 3);
        assert_eq!(summary.peak_power_watts, 2600.0);
        assert_eq!(summary.peak_window, at(1, 8, 15));
        assert_eq!(summary.min_power_watts, 20.0);
        assert!((summary.avg_power_watts - 3040.0 / 3.0).abs() < 1e-9);
        assert!((summary.energy_kwh - 0.76).abs() < 1e-9);
        assert_eq!(summary.productive_buckets, 2);
        assert_eq!(summary.productive_hours, 0.5);
        assert_eq!(summary.low_buckets, 1);

        let trend = summary.trend.unwrap();
        assert_eq!(trend.start, at(1, 8, 0));
        assert_eq!(trend.end, at(1, 8, 30));
        assert_eq!(trend.change_watts, 960.0);
    }

    #[test]
    fn test_single_bucket_has_no_trend() {
        let buckets = vec![bucket(1, 12, 0, 500.0, 600.0, 400.0)];

        let summary = summarize_intervals(&buckets, 15, 50.0)
            .unwrap()
            .ready()
            .unwrap();

        assert!(summary.trend.is_none());
        assert_eq!(summary.peak_window, at(1, 12, 0));
    }

    #[test]
    fn test_empty_summary_is_insufficient() {
        let outcome = summarize_intervals(&[], 15, 50.0).unwrap();
        assert_eq!(outcome.reason(), Some("no aggregated buckets"));
        assert!(summarize_intervals(&[], 9, 50.0).is_err());
    }

    #[test]
    fn test_daily_energy_groups_by_date() {
        let buckets = vec![
            bucket(2, 12, 0, 4000.0, 4000.0, 4000.0),
            bucket(1, 12, 0, 1000.0, 1000.0, 1000.0),
            bucket(1, 13, 0, 3000.0, 3000.0, 3000.0),
        ];

        let days = daily_energy(&buckets, 60).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(days[0].energy_kwh, 4.0);
        assert_eq!(days[1].energy_kwh, 4.0);
    }

    // Helper functions for tests
    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn bucket(day: u32, h: u32, m: u32, avg: f64, max: f64, min: f64) -> AggregateBucket {
        AggregateBucket {
            window_start: at(day, h, m),
            avg_power: avg,
            max_power: max,
            min_power: min,
            sample_count: 1,
        }
    }
}
