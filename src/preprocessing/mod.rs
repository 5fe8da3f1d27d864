//! Cleaning of raw observation series before modelling.
//!
//! The pipeline order is fixed: outlier removal, gap interpolation, then
//! smoothing only when the interpolated series is noisy.
//! Outlier removal that would leave fewer than [`MIN_CLEAN_POINTS`] points
//! is skipped.

mod gaps;
mod outlier;
mod window;

pub use gaps::{count_gaps, interpolate_missing_data, MAX_GAP_DAYS};
pub use outlier::{count_outliers, outlier_mask, remove_outliers};
pub use window::{detect_noise, noise_level, smooth, DEFAULT_SMOOTHING_WINDOW, NOISE_THRESHOLD};

use crate::core::CostObservation;
use tracing::{debug, warn};

/// Fewest points outlier removal may leave behind.
pub const MIN_CLEAN_POINTS: usize = 2;

/// What the preprocessing pipeline did to a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessSummary {
    pub input_points: usize,
    pub outliers_removed: usize,
    pub points_interpolated: usize,
    pub noise_level: f64,
    pub smoothed: bool,
}

/// A cleaned series together with its [`PreprocessSummary`].
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub observations: Vec<CostObservation>,
    pub summary: PreprocessSummary,
}

/// Run the full cleaning pipeline on a timestamp-sorted series.
pub fn preprocess(series: &[CostObservation], outlier_threshold: f64) -> Preprocessed {
    let mut without_outliers = remove_outliers(series, outlier_threshold);
    if without_outliers.len() < MIN_CLEAN_POINTS && series.len() >= MIN_CLEAN_POINTS {
        warn!(
            threshold = outlier_threshold,
            kept = without_outliers.len(),
            "outlier threshold removes almost every point, keeping the series unfiltered"
        );
        without_outliers = series.to_vec();
    }
    let filled = interpolate_missing_data(&without_outliers);

    let noise = noise_level(&filled);
    let smoothed = noise > NOISE_THRESHOLD;
    let observations = if smoothed {
        smooth(&filled, DEFAULT_SMOOTHING_WINDOW)
    } else {
        filled
    };

    let summary = PreprocessSummary {
        input_points: series.len(),
        outliers_removed: series.len() - without_outliers.len(),
        points_interpolated: observations.len() - without_outliers.len(),
        noise_level: noise,
        smoothed,
    };
    debug!(
        input = summary.input_points,
        outliers_removed = summary.outliers_removed,
        interpolated = summary.points_interpolated,
        noise = summary.noise_level,
        smoothed = summary.smoothed,
        "preprocessed cost series"
    );

    Preprocessed {
        observations,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn pipeline_reports_each_stage() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut series: Vec<CostObservation> = (0..20)
            .filter(|&i| i != 5)
            .map(|i| CostObservation::new(start + Duration::days(i), 100.0 + i as f64))
            .collect();
        series.push(CostObservation::new(start + Duration::days(20), 5000.0));

        let out = preprocess(&series, 2.0);
        assert_eq!(out.summary.input_points, 20);
        assert_eq!(out.summary.outliers_removed, 1);
        assert_eq!(out.summary.points_interpolated, 1);
        assert!(!out.summary.smoothed);
        assert_eq!(out.observations.len(), 20);
    }

    #[test]
    fn noisy_series_is_smoothed() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series: Vec<CostObservation> = (0..10)
            .map(|i| {
                let cost = if i % 2 == 0 { 100.0 } else { 160.0 };
                CostObservation::new(start + Duration::days(i), cost)
            })
            .collect();

        let out = preprocess(&series, 3.0);
        assert!(out.summary.smoothed);
        assert_eq!(out.observations[0].total_cost, 100.0);
        assert_eq!(out.observations.len(), 10);
        assert!(out.observations[1].total_cost < 160.0);
    }

    #[test]
    fn threshold_that_empties_the_series_is_ignored() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        // Every point sits exactly one standard deviation from the mean.
        let series: Vec<CostObservation> = (0..20)
            .map(|i| {
                let cost = if i % 2 == 0 { 100.0 } else { 200.0 };
                CostObservation::new(start + Duration::days(i), cost)
            })
            .collect();
        assert!(remove_outliers(&series, 0.5).is_empty());

        let out = preprocess(&series, 0.5);
        assert_eq!(out.summary.outliers_removed, 0);
        assert_eq!(out.observations.len(), 20);
    }
}
