//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, ModelType};
use crate::error::{ForecastError, Result};
use crate::models::ensemble::Ensemble;
use crate::models::exponential::HoltLinearTrend;
use crate::models::linear::LinearRegression;
use crate::models::seasonal::SeasonalDecomposition;
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a daily cost series.
    fn fit(&mut self, values: &[f64]) -> Result<()>;

    /// Generate non-negative point predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with prediction intervals at `interval_pct` percent.
    fn predict_with_intervals(&self, horizon: usize, interval_pct: u8) -> Result<Forecast> {
        let _ = interval_pct;
        self.predict(horizon)
    }

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }

    /// Fit-quality metrics of the in-sample fitted values against `actual`.
    fn in_sample_metrics(&self, actual: &[f64]) -> Result<AccuracyMetrics> {
        let fitted = self.fitted_values().ok_or(ForecastError::FitRequired)?;
        calculate_metrics(actual, fitted)
    }

    /// Accuracy in `[0, 1]` of the in-sample fit: `max(0, 1 - MAPE)`.
    fn in_sample_accuracy(&self, actual: &[f64]) -> Result<f64> {
        Ok(self.in_sample_metrics(actual)?.accuracy())
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use cloud_cost_forecast::models::{BoxedForecaster, Forecaster, LinearRegression};
///
/// let model: BoxedForecaster = Box::new(LinearRegression::new());
/// assert_eq!(model.name(), "LinearRegression");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster + Send>;

/// Create an unfitted model for `model_type`.
///
/// `Auto` has no model of its own and yields `None`; the selector resolves it.
pub fn build_model(model_type: ModelType, seasonal_period: usize) -> Option<BoxedForecaster> {
    match model_type {
        ModelType::Linear => Some(Box::new(LinearRegression::new())),
        ModelType::Exponential => Some(Box::new(HoltLinearTrend::new())),
        ModelType::Seasonal => Some(Box::new(SeasonalDecomposition::new(seasonal_period))),
        ModelType::Ensemble => Some(Box::new(Ensemble::standard(seasonal_period, true))),
        ModelType::Auto => None,
    }
}

/// A fitted model's forecast together with its in-sample fit quality.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRun {
    pub model: ModelType,
    pub forecast: Forecast,
    pub metrics: AccuracyMetrics,
    /// Model accuracy in `[0, 1]`.
    pub accuracy: f64,
}

/// Fit `model` to `values` and forecast `horizon` steps with intervals.
pub fn run_model<F>(
    model_type: ModelType,
    model: &mut F,
    values: &[f64],
    horizon: usize,
    interval_pct: u8,
) -> Result<ModelRun>
where
    F: Forecaster + ?Sized,
{
    model.fit(values)?;
    let forecast = model.predict_with_intervals(horizon, interval_pct)?;
    let metrics = model.in_sample_metrics(values)?;
    let accuracy = model.in_sample_accuracy(values)?;
    Ok(ModelRun {
        model: model_type,
        forecast,
        metrics,
        accuracy,
    })
}
