//! Completeness and consistency scoring of the raw input series.

use crate::core::{days_between, CostObservation};
use crate::error::{ForecastError, Result};
use crate::preprocessing::{count_gaps, count_outliers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Span covered by the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Fractional days between `start` and `end`.
    pub days: f64,
}

/// Quality scores of the series a forecast was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Observed over expected daily points, capped at 1.
    pub completeness: f64,
    /// One minus the share of expected days starting a gap.
    pub consistency: f64,
    pub outlier_count: usize,
    pub data_points: usize,
    pub time_range: TimeRange,
}

/// Score a timestamp-sorted, unfiltered series.
///
/// Expected points are `floor(range days) + 1`; outliers use the same
/// z-score rule as preprocessing.
pub fn assess_data_quality(
    series: &[CostObservation],
    outlier_threshold: f64,
) -> Result<DataQuality> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ForecastError::EmptyData),
    };

    let days = days_between(first.timestamp, last.timestamp);
    let expected = days.max(0.0).floor() + 1.0;
    let totals: Vec<f64> = series.iter().map(|o| o.total_cost).collect();

    Ok(DataQuality {
        completeness: (series.len() as f64 / expected).min(1.0),
        consistency: (1.0 - count_gaps(series) as f64 / expected).max(0.0),
        outlier_count: count_outliers(&totals, outlier_threshold),
        data_points: series.len(),
        time_range: TimeRange {
            start: first.timestamp,
            end: last.timestamp,
            days,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn at(days: &[i64], cost: impl Fn(i64) -> f64) -> Vec<CostObservation> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        days.iter()
            .map(|&d| CostObservation::new(start + Duration::days(d), cost(d)))
            .collect()
    }

    #[test]
    fn complete_daily_series_scores_one() {
        let days: Vec<i64> = (0..14).collect();
        let quality = assess_data_quality(&at(&days, |_| 50.0), 2.0).unwrap();

        assert_eq!(quality.completeness, 1.0);
        assert_eq!(quality.consistency, 1.0);
        assert_eq!(quality.outlier_count, 0);
        assert_eq!(quality.data_points, 14);
        assert_relative_eq!(quality.time_range.days, 13.0);
    }

    #[test]
    fn gaps_reduce_both_scores() {
        // Days 0..=9 with days 3, 4 and 7 missing: 7 points, 10 expected, 2 gaps.
        let quality = assess_data_quality(&at(&[0, 1, 2, 5, 6, 8, 9], |_| 50.0), 2.0).unwrap();
        assert_relative_eq!(quality.completeness, 0.7, epsilon = 1e-12);
        assert_relative_eq!(quality.consistency, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn outliers_are_counted_on_raw_series() {
        let days: Vec<i64> = (0..20).collect();
        let series = at(&days, |d| if d == 10 { 1000.0 } else { 100.0 });
        assert_eq!(assess_data_quality(&series, 2.0).unwrap().outlier_count, 1);
    }

    #[test]
    fn single_point_and_empty_series() {
        let quality = assess_data_quality(&at(&[0], |_| 1.0), 2.0).unwrap();
        assert_eq!(quality.completeness, 1.0);
        assert_eq!(quality.time_range.days, 0.0);

        assert_eq!(
            assess_data_quality(&[], 2.0),
            Err(ForecastError::EmptyData)
        );
    }
}
