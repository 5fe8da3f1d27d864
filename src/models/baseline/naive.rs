//! Naive forecasting model.
//!
//! Repeats the last observed cost. Used as the last resort when no
//! statistical model can be fitted.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;

/// Naive forecaster that repeats the last value with a zero-width interval.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last_value: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for Naive {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        let last = *values.last().ok_or(ForecastError::EmptyData)?;
        if !last.is_finite() {
            return Err(ForecastError::ComputationError(
                "naive forecast received a non-finite last value".to_string(),
            ));
        }

        // y_hat[t] = y[t-1]; the first point is its own fit.
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(values[0]);
        fitted.extend_from_slice(&values[..values.len() - 1]);

        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.last_value = Some(last);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let last = self.last_value.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![last.max(0.0); horizon]))
    }

    fn predict_with_intervals(&self, horizon: usize, _interval_pct: u8) -> Result<Forecast> {
        let last = self.last_value.ok_or(ForecastError::FitRequired)?;
        Forecast::from_half_widths(&vec![last; horizon], &vec![0.0; horizon])
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "Naive"
    }
}
