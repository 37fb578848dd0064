//! Relative underperformance detection across a cohort of panels.
//!
//! Each panel's mean power is compared with the best panel's mean. The
//! detector does no time filtering of its own; callers pass whatever readings
//! should count (typically daylight only).

use tracing::{debug, warn};

use crate::analyzers::types::PanelSummary;
use crate::analyzers::utility::{max, mean, pct, stddev};
use crate::config::validate_threshold;
use crate::error::{AnalysisError, Outcome};
use crate::reading::Reading;

/// Summarises every panel and ranks them best first.
///
/// Panels without readings are left out. An empty cohort is insufficient
/// data. When the best mean is not positive every panel reports 0% and the
/// cohort is treated as idle.
pub fn rank_panels<I, K, V>(panels: I) -> Outcome<Vec<PanelSummary>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[Reading]>,
{
    let mut stats: Vec<(String, f64, f64, f64)> = Vec::new();

    for (panel_id, readings) in panels {
        let powers: Vec<f64> = readings.as_ref().iter().map(|r| r.power_watts).collect();
        let Some(peak) = max(powers.iter().copied()) else {
            debug!(panel_id = panel_id.as_ref(), "Panel has no readings, skipping");
            continue;
        };
        let avg = mean(&powers);
        stats.push((panel_id.as_ref().to_string(), avg, peak, stddev(&powers, avg)));
    }

    if stats.is_empty() {
        warn!("No panel readings to compare");
        return Outcome::insufficient("no panels with readings");
    }

    let best = max(stats.iter().map(|(_, avg, _, _)| *avg)).unwrap_or(0.0);
    let baseline = if best > 0.0 { best } else { 0.0 };

    let mut summaries: Vec<PanelSummary> = stats
        .into_iter()
        .map(|(panel_id, avg, peak, sd)| PanelSummary {
            panel_id,
            mean_power_watts: avg,
            max_power_watts: peak,
            stddev_power_watts: sd,
            efficiency_pct: pct(avg, baseline),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.efficiency_pct
            .total_cmp(&a.efficiency_pct)
            .then_with(|| a.panel_id.cmp(&b.panel_id))
    });

    Outcome::Ready(summaries)
}

/// Panels whose efficiency relative to the best panel is below
/// `threshold_percent`, worst first.
///
/// A cohort whose best mean power is zero flags nothing.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidThreshold`] unless the threshold is within 0..=100.
pub fn find_underperforming_panels<I, K, V>(
    panels: I,
    threshold_percent: f64,
) -> Result<Outcome<Vec<PanelSummary>>, AnalysisError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[Reading]>,
{
    validate_threshold(threshold_percent)?;

    Ok(rank_panels(panels).map(|ranked| {
        if ranked.iter().all(|p| p.mean_power_watts <= 0.0) {
            warn!(panels = ranked.len(), "Cohort produced no power, nothing flagged");
            return Vec::new();
        }

        let mut flagged: Vec<PanelSummary> = ranked
            .into_iter()
            .filter(|p| p.efficiency_pct < threshold_percent)
            .collect();
        flagged.reverse();

        debug!(flagged = flagged.len(), threshold_percent, "Underperforming panels");
        flagged
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_flags_weak_panel_against_best() {
        let panels = cohort(&[("A", 100.0), ("B", 95.0), ("C", 40.0)]);

        let flagged = find_underperforming_panels(&panels, 85.0)
            .unwrap()
            .ready()
            .unwrap();

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].panel_id, "C");
        assert_eq!(flagged[0].efficiency_pct, 40.0);
        assert_eq!(flagged[0].mean_power_watts, 40.0);
    }

    #[test]
    fn test_rank_panels_orders_best_first() {
        let panels = cohort(&[("A", 100.0), ("B", 95.0), ("C", 40.0)]);

        let ranked = rank_panels(&panels).ready().unwrap();

        let ids: Vec<&str> = ranked.iter().map(|p| p.panel_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(ranked[0].efficiency_pct, 100.0);
        assert_eq!(ranked[1].efficiency_pct, 95.0);
    }

    #[test]
    fn test_flagged_sorted_worst_first() {
        let panels = cohort(&[("A", 100.0), ("B", 50.0), ("C", 20.0), ("D", 70.0)]);

        let flagged = find_underperforming_panels(&panels, 85.0)
            .unwrap()
            .ready()
            .unwrap();

        let ids: Vec<&str> = flagged.iter().map(|p| p.panel_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "B", "D"]);
    }

    #[test]
    fn test_mean_max_and_stddev() {
        let mut panels = BTreeMap::new();
        panels.insert(
            "P1".to_string(),
            vec![
                reading(10, 0, 100.0, "P1"),
                reading(10, 1, 300.0, "P1"),
            ],
        );

        let ranked = rank_panels(&panels).ready().unwrap();

        assert_eq!(ranked[0].mean_power_watts, 200.0);
        assert_eq!(ranked[0].max_power_watts, 300.0);
        assert_eq!(ranked[0].stddev_power_watts, 100.0);
    }

    #[test]
    fn test_single_panel_cohort() {
        let panels = cohort(&[("solo", 42.0)]);

        let flagged = find_underperforming_panels(&panels, 85.0)
            .unwrap()
            .ready()
            .unwrap();

        assert!(flagged.is_empty());
    }

    #[test]
    fn test_zero_mean_cohort_flags_nothing() {
        let panels = cohort(&[("A", 0.0), ("B", 0.0)]);

        let flagged = find_underperforming_panels(&panels, 85.0)
            .unwrap()
            .ready()
            .unwrap();

        assert!(flagged.is_empty());
        let ranked = rank_panels(&panels).ready().unwrap();
        assert!(ranked.iter().all(|p| p.efficiency_pct == 0.0));
    }

    #[test]
    fn test_empty_cohort_is_insufficient() {
        let empty: BTreeMap<String, Vec<Reading>> = BTreeMap::new();
        let outcome = find_underperforming_panels(&empty, 85.0).unwrap();
        assert_eq!(outcome.reason(), Some("no panels with readings"));

        let mut no_readings: BTreeMap<String, Vec<Reading>> = BTreeMap::new();
        no_readings.insert("ghost".to_string(), vec![]);
        assert!(!find_underperforming_panels(&no_readings, 85.0)
            .unwrap()
            .is_ready());
    }

    #[test]
    fn test_panels_without_readings_are_excluded() {
        let mut panels = cohort(&[("A", 100.0), ("B", 30.0)]);
        panels.insert("ghost".to_string(), vec![]);

        let ranked = rank_panels(&panels).ready().unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|p| p.panel_id != "ghost"));
    }

    #[test]
    fn test_invalid_threshold() {
        let panels = cohort(&[("A", 100.0)]);
        assert!(matches!(
            find_underperforming_panels(&panels, 120.0),
            Err(AnalysisError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_accepts_hash_map() {
        let mut panels: HashMap<String, Vec<Reading>> = HashMap::new();
        panels.insert("X".into(), vec![reading(10, 0, 10.0, "X")]);
        panels.insert("Y".into(), vec![reading(10, 0, 100.0, "Y")]);

        let flagged = find_underperforming_panels(&panels, 85.0)
            .unwrap()
            .ready()
            .unwrap();

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].panel_id, "X");
    }

    // Helper functions for tests
    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn reading(h: u32, m: u32, power: f64, panel: &str) -> Reading {
        Reading::new(at(h, m), power).with_device(panel)
    }

    /// Each panel gets three readings averaging `mean`.
    fn cohort(means: &[(&str, f64)]) -> BTreeMap<String, Vec<Reading>> {
        means
            .iter()
            .map(|(id, mean)| {
                let readings = vec![
                    reading(12, 0, mean * 0.5, id),
                    reading(12, 1, *mean, id),
                    reading(12, 2, mean * 1.5, id),
                ];
                (id.to_string(), readings)
            })
            .collect()
    }
}
