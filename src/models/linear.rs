//! Linear trend forecasting by ordinary least squares.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::ols::{fit_trend, TrendFit};
use crate::utils::stats::t_value;

/// OLS trend forecaster on `(day index, cost)` pairs.
///
/// Step `h` is predicted at index `n - 1 + h` with the classical
/// prediction interval `t * SE * sqrt(1 + 1/n + (x - x̄)² / Sxx)`.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    fit: Option<TrendFit>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying trend fit.
    pub fn trend(&self) -> Option<&TrendFit> {
        self.fit.as_ref()
    }

    fn future_index(fit: &TrendFit, h: usize) -> f64 {
        (fit.n - 1 + h) as f64
    }
}

impl Forecaster for LinearRegression {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        let fit = fit_trend(values)?;
        let fitted = fit.fitted();
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.fit = Some(fit);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let fit = self.fit.as_ref().ok_or(ForecastError::FitRequired)?;
        let predictions = (1..=horizon)
            .map(|h| fit.value_at(Self::future_index(fit, h)).max(0.0))
            .collect();
        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, interval_pct: u8) -> Result<Forecast> {
        let fit = self.fit.as_ref().ok_or(ForecastError::FitRequired)?;
        let t = t_value(interval_pct, fit.degrees_of_freedom());

        let (raw, half_widths): (Vec<f64>, Vec<f64>) = (1..=horizon)
            .map(|h| {
                let x = Self::future_index(fit, h);
                (fit.value_at(x), fit.prediction_half_width(x, t))
            })
            .unzip();

        Forecast::from_half_widths(&raw, &half_widths)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }
}
