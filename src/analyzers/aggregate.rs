use std::borrow::Cow;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::analyzers::types::AggregateBucket;
use crate::analyzers::utility::window_start;
use crate::config::validate_window;
use crate::error::AnalysisError;
use crate::reading::Reading;

/// Running totals for the window currently being filled.
struct OpenBucket {
    window_start: NaiveDateTime,
    weighted_sum: f64,
    max: f64,
    min: f64,
    count: u32,
}

impl OpenBucket {
    fn new(window_start: NaiveDateTime) -> Self {
        OpenBucket {
            window_start,
            weighted_sum: 0.0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            count: 0,
        }
    }

    fn add(&mut self, avg: f64, max: f64, min: f64, count: u32) {
        self.weighted_sum += avg * count as f64;
        self.max = self.max.max(max);
        self.min = self.min.min(min);
        self.count += count;
    }

    fn close(self) -> AggregateBucket {
        AggregateBucket {
            window_start: self.window_start,
            avg_power: self.weighted_sum / self.count as f64,
            max_power: self.max,
            min_power: self.min,
            sample_count: self.count,
        }
    }
}

/// Buckets readings into fixed windows of `window_minutes`.
///
/// One bucket is emitted per occupied window, in ascending order; empty
/// windows are never synthesised. Input that is not in time order is
/// stable-sorted first. Non-finite power values count as 0 W.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidWindow`] unless `window_minutes` divides 60.
pub fn aggregate_intervals(
    readings: &[Reading],
    window_minutes: u32,
) -> Result<Vec<AggregateBucket>, AnalysisError> {
    validate_window(window_minutes)?;

    let ordered = in_time_order(readings, |r| r.timestamp);
    let buckets = fold_windows(
        ordered.iter().map(|r| {
            let power = finite_or_zero(r.power_watts);
            (r.timestamp, power, power, power, 1)
        }),
        window_minutes,
    );

    debug!(
        readings = readings.len(),
        buckets = buckets.len(),
        window_minutes,
        "Aggregated readings"
    );
    Ok(buckets)
}

/// Regroups buckets into windows of `window_minutes`.
///
/// Averages are weighted by `sample_count`, so merging at the original window
/// size reproduces the input. Intended for coarsening, e.g. 15 to 60 minutes.
pub fn merge_buckets(
    buckets: &[AggregateBucket],
    window_minutes: u32,
) -> Result<Vec<AggregateBucket>, AnalysisError> {
    validate_window(window_minutes)?;

    let ordered = in_time_order(buckets, |b| b.window_start);
    Ok(fold_windows(
        ordered.iter().map(|b| {
            (
                b.window_start,
                b.avg_power,
                b.max_power,
                b.min_power,
                b.sample_count,
            )
        }),
        window_minutes,
    ))
}

/// Single pass over time-ordered `(timestamp, avg, max, min, count)` items,
/// flushing the open bucket whenever the window changes.
fn fold_windows(
    items: impl Iterator<Item = (NaiveDateTime, f64, f64, f64, u32)>,
    window_minutes: u32,
) -> Vec<AggregateBucket> {
    let mut buckets = Vec::new();
    let mut current: Option<OpenBucket> = None;

    for (timestamp, avg, max, min, count) in items {
        if count == 0 {
            continue;
        }

        let start = window_start(timestamp, window_minutes);
        if current.as_ref().is_some_and(|open| open.window_start != start) {
            if let Some(done) = current.take() {
                buckets.push(done.close());
            }
        }

        current
            .get_or_insert_with(|| OpenBucket::new(start))
            .add(avg, max, min, count);
    }

    if let Some(done) = current {
        buckets.push(done.close());
    }

    buckets
}

fn finite_or_zero(power: f64) -> f64 {
    if power.is_finite() { power } else { 0.0 }
}

fn in_time_order<T: Clone>(items: &[T], key: impl Fn(&T) -> NaiveDateTime) -> Cow<'_, [T]> {
    if items.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1])) {
        return Cow::Borrowed(items);
    }

    debug!(len = items.len(), "Input out of time order, sorting");
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| key(item));
    Cow::Owned(sorted)
}
