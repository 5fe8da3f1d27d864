//! Statistical utility functions.

use statrs::statistics::Statistics;

/// Degrees of freedom below which the small-sample correction applies.
const SMALL_SAMPLE_DOF: usize = 30;

/// Multiplier applied to the critical value for small samples.
const SMALL_SAMPLE_CORRECTION: f64 = 1.2;

/// Critical value for a two-sided prediction interval.
///
/// A fixed lookup of normal quantiles, inflated by 1.2 when fewer than 30
/// degrees of freedom are available. Unrecognized levels use the 95% value.
///
/// # Example
/// ```
/// use cloud_cost_forecast::utils::stats::t_value;
///
/// assert_eq!(t_value(95, 100), 1.96);
/// assert!((t_value(95, 10) - 2.352).abs() < 1e-12);
/// ```
pub fn t_value(interval_pct: u8, degrees_of_freedom: usize) -> f64 {
    let base = match interval_pct {
        80 => 1.282,
        90 => 1.645,
        95 => 1.96,
        99 => 2.576,
        _ => 1.96,
    };
    if degrees_of_freedom < SMALL_SAMPLE_DOF {
        base * SMALL_SAMPLE_CORRECTION
    } else {
        base
    }
}

/// Calculate the mean of a slice, zero when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator), zero when empty.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}

/// Mean squared value of a slice, zero when empty.
pub fn mean_square(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

/// Coefficient of variation (`std / mean`), zero for a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m.abs() < f64::EPSILON {
        return 0.0;
    }
    population_std_dev(values) / m
}

/// Calculate the autocorrelation at a given lag.
///
/// Returns zero when the series is not longer than `lag` or has no variance.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return 0.0;
    }
    let m = mean(values);
    let n = values.len();

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for i in 0..n {
        denominator += (values[i] - m).powi(2);
        if i >= lag {
            numerator += (values[i] - m) * (values[i - lag] - m);
        }
    }

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Relative change between the means of the first and second halves, in percent.
///
/// The first half is `[0, n/2)`. A zero first-half mean yields 0 when the
/// second half is also zero and 100 otherwise.
pub fn half_over_half_growth_pct(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mid = values.len() / 2;
    let first = mean(&values[..mid]);
    let second = mean(&values[mid..]);
    if first.abs() < f64::EPSILON {
        return if second.abs() < f64::EPSILON { 0.0 } else { 100.0 };
    }
    (second - first) / first * 100.0
}
