//! Z-score outlier filtering on daily totals.

use crate::core::CostObservation;
use crate::utils::stats::{mean, population_std_dev};

/// Flag every value farther than `threshold` population standard
/// deviations from the mean.
///
/// A constant series has no outliers.
pub fn outlier_mask(values: &[f64], threshold: f64) -> Vec<bool> {
    if values.is_empty() {
        return Vec::new();
    }

    let mu = mean(values);
    let sd = population_std_dev(values);
    if !sd.is_finite() || sd < 1e-12 {
        return vec![false; values.len()];
    }

    let limit = threshold * sd;
    values.iter().map(|x| (x - mu).abs() > limit).collect()
}

/// Number of values flagged by [`outlier_mask`].
pub fn count_outliers(values: &[f64], threshold: f64) -> usize {
    outlier_mask(values, threshold)
        .into_iter()
        .filter(|&flag| flag)
        .count()
}

/// Copy of `series` without the observations whose total cost is an outlier.
pub fn remove_outliers(series: &[CostObservation], threshold: f64) -> Vec<CostObservation> {
    let totals: Vec<f64> = series.iter().map(|o| o.total_cost).collect();
    series
        .iter()
        .zip(outlier_mask(&totals, threshold))
        .filter(|(_, outlier)| !outlier)
        .map(|(obs, _)| obs.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(costs: &[f64]) -> Vec<CostObservation> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        costs
            .iter()
            .enumerate()
            .map(|(i, &c)| CostObservation::new(start + Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn spike_is_removed() {
        let mut costs = vec![100.0; 19];
        costs.push(1000.0);
        let input = series(&costs);

        let cleaned = remove_outliers(&input, 2.0);
        assert_eq!(cleaned.len(), 19);
        assert!(cleaned.iter().all(|o| o.total_cost == 100.0));
        // Input is untouched.
        assert_eq!(input.len(), 20);
    }

    #[test]
    fn constant_series_has_no_outliers() {
        assert_eq!(count_outliers(&[5.0; 10], 2.0), 0);
        assert!(outlier_mask(&[], 2.0).is_empty());
    }

    #[test]
    fn threshold_is_in_standard_deviations() {
        // mean 0, population sd 1: every point sits one sd away.
        let values = [-1.0, 1.0, -1.0, 1.0];
        assert_eq!(count_outliers(&values, 1.5), 0);
        assert_eq!(count_outliers(&values, 0.5), 4);
    }
}
