//! Accuracy metrics for fit and holdout evaluation.

use crate::error::{ForecastError, Result};

/// Residual sum of squares treated as zero when the total variance is zero.
const ZERO_RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error as a fraction (0.1 = 10%)
    pub mape: f64,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
}

impl AccuracyMetrics {
    /// Accuracy in `[0, 1]`: `1 - MAPE`, floored at zero.
    pub fn accuracy(&self) -> f64 {
        accuracy_from_mape(self.mape)
    }
}

/// Convert a fractional MAPE into an accuracy score in `[0, 1]`.
pub fn accuracy_from_mape(mape: f64) -> f64 {
    if mape.is_finite() {
        (1.0 - mape).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ForecastError::ComputationError(format!(
            "metric inputs differ in length: expected {}, got {}",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;

    let mae: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let mse = ss_res / n;
    let rmse = mse.sqrt();

    let mape = mean_absolute_percentage_error(actual, predicted);

    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let r_squared = r_squared(ss_res, ss_tot);

    Ok(AccuracyMetrics {
        mae,
        mse,
        rmse,
        mape,
        r_squared,
    })
}

/// Coefficient of determination from residual and total sums of squares.
///
/// A constant series (`ss_tot == 0`) has an undefined R²; it is reported as
/// 1 when the fit is also exact and 0 otherwise, never NaN.
pub fn r_squared(ss_res: f64, ss_tot: f64) -> f64 {
    if ss_tot.abs() < f64::EPSILON {
        if ss_res.abs() < ZERO_RESIDUAL_TOLERANCE {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Mean absolute percentage error as a fraction.
///
/// Predictions are paired index by index with `actual`; the sum is divided
/// by `actual.len()`. Zero actuals and predictions without a matching actual
/// contribute no error.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    sum / actual.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_fit_scores_full_accuracy() {
        let costs = [120.0, 135.5, 128.0, 141.25];
        let metrics = calculate_metrics(&costs, &costs).unwrap();

        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mape, 0.0);
        assert_eq!(metrics.r_squared, 1.0);
        assert_eq!(metrics.accuracy(), 1.0);
    }

    #[test]
    fn daily_cost_errors() {
        // Off by +10, -10, +20, 0 dollars.
        let actual = [100.0, 200.0, 100.0, 50.0];
        let predicted = [110.0, 190.0, 120.0, 50.0];
        let metrics = calculate_metrics(&actual, &predicted).unwrap();

        assert_relative_eq!(metrics.mae, 10.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.mse, 150.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.rmse, 150.0_f64.sqrt(), epsilon = 1e-12);
        // (0.1 + 0.05 + 0.2 + 0) / 4
        assert_relative_eq!(metrics.mape, 0.0875, epsilon = 1e-12);
        assert_relative_eq!(metrics.accuracy(), 0.9125, epsilon = 1e-12);
    }

    #[test]
    fn mape_skips_zero_actuals() {
        let actual = vec![0.0, 10.0];
        let predicted = vec![5.0, 12.0];
        // Only the second pair counts: 0.2 / 2
        assert_relative_eq!(
            mean_absolute_percentage_error(&actual, &predicted),
            0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn mape_with_short_predictions() {
        let actual = vec![10.0, 10.0, 10.0, 10.0];
        let predicted = vec![12.0, 8.0];
        assert_relative_eq!(
            mean_absolute_percentage_error(&actual, &predicted),
            0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn accuracy_is_floored_at_zero() {
        assert_eq!(accuracy_from_mape(1.7), 0.0);
        assert_eq!(accuracy_from_mape(f64::NAN), 0.0);
        assert_relative_eq!(accuracy_from_mape(0.25), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn r_squared_constant_series_policy() {
        assert_eq!(r_squared(0.0, 0.0), 1.0);
        assert_eq!(r_squared(4.0, 0.0), 0.0);
        assert_relative_eq!(r_squared(2.0, 8.0), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_or_empty_inputs_are_errors() {
        assert!(matches!(
            calculate_metrics(&[10.0, 20.0, 30.0], &[10.0, 20.0]),
            Err(ForecastError::ComputationError(_))
        ));
        assert_eq!(calculate_metrics(&[], &[]), Err(ForecastError::EmptyData));
    }

    #[test]
    fn reversed_trend_has_negative_r_squared() {
        let rising = [100.0, 110.0, 120.0, 130.0];
        let falling = [130.0, 120.0, 110.0, 100.0];
        let metrics = calculate_metrics(&rising, &falling).unwrap();
        assert!(metrics.r_squared < 0.0);
    }
}
