//! Ordinary least squares trend fitting on `(index, value)` pairs.

use crate::error::{ForecastError, Result};
use crate::utils::metrics::r_squared;

/// Closed-form OLS fit of `value = slope * index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observations.
    pub n: usize,
    /// Mean of the indices `0..n`.
    pub x_mean: f64,
    /// `Σ(x - x̄)²` over the indices.
    pub sxx: f64,
    /// Residual sum of squares.
    pub ss_residual: f64,
    /// Total sum of squares around the mean.
    pub ss_total: f64,
}

impl TrendFit {
    /// Fitted value at index `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Coefficient of determination, never NaN.
    pub fn r_squared(&self) -> f64 {
        r_squared(self.ss_residual, self.ss_total)
    }

    /// Degrees of freedom of the residuals.
    pub fn degrees_of_freedom(&self) -> usize {
        self.n.saturating_sub(2)
    }

    /// Residual variance `SSres / (n - 2)`.
    pub fn residual_variance(&self) -> f64 {
        match self.degrees_of_freedom() {
            0 => 0.0,
            dof => self.ss_residual / dof as f64,
        }
    }

    /// Standard error of the regression.
    pub fn standard_error(&self) -> f64 {
        self.residual_variance().sqrt()
    }

    /// Half-width of the prediction interval at index `x`:
    /// `t * SE * sqrt(1 + 1/n + (x - x̄)² / Sxx)`.
    pub fn prediction_half_width(&self, x: f64, t: f64) -> f64 {
        let leverage = 1.0 + 1.0 / self.n as f64 + (x - self.x_mean).powi(2) / self.sxx;
        t * self.standard_error() * leverage.sqrt()
    }

    /// In-sample fitted values for indices `0..n`.
    pub fn fitted(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.value_at(i as f64)).collect()
    }
}

/// Fit a linear trend to `values` indexed `0..n`.
///
/// Requires at least three points so that the residual variance has a
/// positive number of degrees of freedom.
pub fn fit_trend(values: &[f64]) -> Result<TrendFit> {
    let n = values.len();
    if n < 3 {
        return Err(ForecastError::InsufficientData { needed: 3, got: n });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::ComputationError(
            "trend fit received non-finite values".to_string(),
        ));
    }

    let nf = n as f64;
    let x_mean = (nf - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    if sxx == 0.0 {
        return Err(ForecastError::ComputationError(
            "degenerate trend design".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let mut ss_residual = 0.0;
    let mut ss_total = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let fitted = slope * i as f64 + intercept;
        ss_residual += (y - fitted).powi(2);
        ss_total += (y - y_mean).powi(2);
    }

    Ok(TrendFit {
        slope,
        intercept,
        n,
        x_mean,
        sxx,
        ss_residual,
        ss_total,
    })
}
