use chrono::{NaiveDateTime, Timelike};

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Largest value, ignoring NaN. `None` for empty input.
pub fn max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().filter(|v| !v.is_nan()).reduce(f64::max)
}

/// Smallest value, ignoring NaN. `None` for empty input.
pub fn min(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().filter(|v| !v.is_nan()).reduce(f64::min)
}

/// Start of the window containing `timestamp`.
///
/// The minute is floored to a multiple of `window_minutes`; seconds and
/// sub-seconds are zeroed. `window_minutes` must divide 60.
pub fn window_start(timestamp: NaiveDateTime, window_minutes: u32) -> NaiveDateTime {
    let minute = (timestamp.minute() / window_minutes) * window_minutes;
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), minute, 0)
        .unwrap_or(timestamp)
}

/// Percentage of `part` in `whole`, or 0.0 when `whole` is zero.
pub fn pct(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { 100.0 * part / whole }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_mean_and_stddev() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(stddev(&[], 0.0), 0.0);
        assert_eq!(stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0), 2.0);
    }

    #[test]
    fn test_max_min_skip_nan() {
        assert_eq!(max([1.0, f64::NAN, 3.0]), Some(3.0));
        assert_eq!(min([1.0, f64::NAN, 3.0]), Some(1.0));
        assert_eq!(max(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_window_start_floors_minute() {
        assert_eq!(window_start(at(10, 14, 59), 15), at(10, 0, 0));
        assert_eq!(window_start(at(10, 15, 0), 15), at(10, 15, 0));
        assert_eq!(window_start(at(10, 59, 30), 15), at(10, 45, 0));
        assert_eq!(window_start(at(10, 59, 30), 60), at(10, 0, 0));
        assert_eq!(window_start(at(10, 7, 12), 1), at(10, 7, 0));
    }

    #[test]
    fn test_pct_with_zero_whole() {
        assert_eq!(pct(10.0, 0.0), 0.0);
        assert_eq!(pct(1.0, 4.0), 25.0);
    }
}
