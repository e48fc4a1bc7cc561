//! Aggregate statistics over numeric series parsed from the benchmark logs.
//!
//! All aggregates are order-independent. Empty series are an error
//! (`EmptyInput`), never a silent NaN.

use crate::error::ReportError;

/// Arithmetic mean.
pub fn mean(values: &[i64]) -> Result<f64, ReportError> {
    if values.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    Ok(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}

pub fn min(values: &[i64]) -> Result<i64, ReportError> {
    values.iter().copied().min().ok_or(ReportError::EmptyInput)
}

pub fn max(values: &[i64]) -> Result<i64, ReportError> {
    values.iter().copied().max().ok_or(ReportError::EmptyInput)
}

/// Percentile with linear interpolation between closest ranks (the numpy
/// default). `percentile(s, 0)` is the minimum and `percentile(s, 100)` the
/// maximum, exactly.
pub fn percentile(values: &[i64], p: f64) -> Result<f64, ReportError> {
    if values.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(ReportError::InvalidPercentile(p));
    }
    let mut sorted: Vec<i64> = values.to_vec();
    sorted.sort_unstable();

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo] as f64);
    }
    let frac = rank - lo as f64;
    Ok(sorted[lo] as f64 + frac * (sorted[hi] - sorted[lo]) as f64)
}

/// Pods created per second: row count divided by the measurement window
/// `max(end) - min(start)`. A zero-length window is an explicit error rather
/// than an infinity sentinel.
pub fn throughput(starts: &[i64], ends: &[i64]) -> Result<f64, ReportError> {
    let window = window_secs(starts, ends)?;
    if window == 0 {
        return Err(ReportError::ZeroWindow);
    }
    Ok(starts.len() as f64 / window as f64)
}

/// Measurement window spanned by the run: `max(end) - min(start)`.
pub fn window_secs(starts: &[i64], ends: &[i64]) -> Result<i64, ReportError> {
    Ok(max(ends)? - min(starts)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_lies_between_min_and_max() {
        let s = [7, 1, 4, 4, 9, 2];
        let m = mean(&s).unwrap();
        assert!(min(&s).unwrap() as f64 <= m);
        assert!(m <= max(&s).unwrap() as f64);
    }

    #[test]
    fn percentile_endpoints_are_min_and_max() {
        let s = [5, 3, 8, 1, 12];
        assert_eq!(percentile(&s, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&s, 100.0).unwrap(), 12.0);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        // ranks 0..3 over [1,2,3,4]; p50 -> rank 1.5 -> 2.5
        let s = [4, 1, 3, 2];
        assert_eq!(percentile(&s, 50.0).unwrap(), 2.5);
        // p99 over 0..=99 -> rank 98.01 -> 98.01
        let s: Vec<i64> = (0..100).collect();
        let p99 = percentile(&s, 99.0).unwrap();
        assert!((p99 - 98.01).abs() < 1e-9);
    }

    #[test]
    fn percentile_out_of_range_is_rejected() {
        assert!(percentile(&[1, 2], 101.0).is_err());
    }

    #[test]
    fn empty_series_is_empty_input() {
        assert!(matches!(mean(&[]).unwrap_err(), ReportError::EmptyInput));
        assert!(matches!(
            percentile(&[], 99.0).unwrap_err(),
            ReportError::EmptyInput
        ));
        assert!(matches!(min(&[]).unwrap_err(), ReportError::EmptyInput));
    }

    #[test]
    fn throughput_over_two_pod_window() {
        // rows "1,0,5" and "2,2,7": window 7 - 0 = 7, two pods.
        let starts = [0, 2];
        let ends = [5, 7];
        assert_eq!(window_secs(&starts, &ends).unwrap(), 7);
        let t = throughput(&starts, &ends).unwrap();
        assert!((t - 2.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn throughput_is_order_independent() {
        let starts = [3, 0, 2, 1];
        let ends = [9, 5, 12, 7];
        let reference = throughput(&starts, &ends).unwrap();
        let starts_rev = [1, 2, 0, 3];
        let ends_rev = [7, 12, 5, 9];
        assert_eq!(throughput(&starts_rev, &ends_rev).unwrap(), reference);
    }

    #[test]
    fn zero_window_is_an_error() {
        let starts = [5, 5];
        let ends = [5, 5];
        assert!(matches!(
            throughput(&starts, &ends).unwrap_err(),
            ReportError::ZeroWindow
        ));
    }
}
