//! Chronological holdout validation for time series models.

use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::metrics::{accuracy_from_mape, mean_absolute_percentage_error};

/// Share of the series used for training in a holdout split.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Outcome of scoring one model on a holdout split.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutResult {
    /// `max(0, 1 - MAPE)` on the test slice.
    pub score: f64,
    /// Fractional MAPE on the test slice.
    pub mape: f64,
    /// Predictions made for the test slice.
    pub predictions: Vec<f64>,
}

/// Split `values` chronologically: the first `floor(n * train_fraction)`
/// points train, the rest test. No shuffling.
pub fn holdout_split(values: &[f64], train_fraction: f64) -> (&[f64], &[f64]) {
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split = ((values.len() as f64) * fraction).floor() as usize;
    values.split_at(split.min(values.len()))
}

/// Fit `model` on the training slice and score its forecast of the test slice.
///
/// Prediction `i` is paired with `test[i]`.
///
/// # Example
/// ```
/// use cloud_cost_forecast::models::LinearRegression;
/// use cloud_cost_forecast::utils::cross_validation::holdout_score;
///
/// let values: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
/// let mut model = LinearRegression::new();
/// let result = holdout_score(&values, 0.8, &mut model).unwrap();
///
/// assert_eq!(result.predictions.len(), 4);
/// assert!(result.score > 0.99);
/// ```
pub fn holdout_score<F>(values: &[f64], train_fraction: f64, model: &mut F) -> Result<HoldoutResult>
where
    F: Forecaster + ?Sized,
{
    let (train, test) = holdout_split(values, train_fraction);
    if test.is_empty() {
        return Err(ForecastError::InsufficientData {
            needed: values.len() + 1,
            got: values.len(),
        });
    }

    model.fit(train)?;
    let forecast = model.predict(test.len())?;
    let predictions = forecast.primary().to_vec();

    let mape = mean_absolute_percentage_error(test, &predictions);
    Ok(HoldoutResult {
        score: accuracy_from_mape(mape),
        mape,
        predictions,
    })
}
