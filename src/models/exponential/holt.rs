//! Holt's Linear Trend forecasting model.
//!
//! Also known as double exponential smoothing, this model tracks a level and
//! a trend and suits cost series with a drift but no weekly cycle.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::stats::{mean_square, t_value};

/// Default level smoothing parameter.
pub const DEFAULT_ALPHA: f64 = 0.3;
/// Default trend smoothing parameter.
pub const DEFAULT_BETA: f64 = 0.3;

/// Growth of the interval variance per squared step.
const HORIZON_VARIANCE_GROWTH: f64 = 0.1;

/// Holt's Linear Trend forecaster with fixed smoothing constants.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + h × b_t`
///
/// Intervals use `t × sqrt(σ² × (1 + 0.1 h²))` where `σ²` is the mean squared
/// gap between the observations and the smoothed level series. This is a
/// simplified interval, not the exact Holt variance.
#[derive(Debug, Clone)]
pub struct HoltLinearTrend {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: f64,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: f64,
    /// Current level state.
    level: Option<f64>,
    /// Current trend state.
    trend: Option<f64>,
    /// Smoothed level series, used as fitted values.
    fitted: Option<Vec<f64>>,
    /// Residuals.
    residuals: Option<Vec<f64>>,
    /// Mean squared residual.
    residual_variance: f64,
    /// Original series length.
    n: usize,
}

impl HoltLinearTrend {
    /// Create a Holt model with `α = β = 0.3`.
    pub fn new() -> Self {
        Self::with_params(DEFAULT_ALPHA, DEFAULT_BETA)
    }

    /// Create a Holt model with explicit smoothing constants.
    ///
    /// # Arguments
    /// * `alpha` - Level smoothing parameter (0 < alpha < 1)
    /// * `beta` - Trend smoothing parameter (0 < beta < 1)
    pub fn with_params(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0001, 0.9999),
            beta: beta.clamp(0.0001, 0.9999),
            level: None,
            trend: None,
            fitted: None,
            residuals: None,
            residual_variance: 0.0,
            n: 0,
        }
    }

    /// Get the level smoothing parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Get the trend smoothing parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Get the current level.
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Get the current trend.
    pub fn trend(&self) -> Option<f64> {
        self.trend
    }

    fn state(&self) -> Result<(f64, f64)> {
        match (self.level, self.trend) {
            (Some(l), Some(b)) => Ok((l, b)),
            _ => Err(ForecastError::FitRequired),
        }
    }
}

impl Default for HoltLinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for HoltLinearTrend {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(
                "exponential smoothing received non-finite values".to_string(),
            ));
        }

        self.n = values.len();

        // Level starts at the first observation, trend at the first difference.
        let mut l = values[0];
        let mut b = values[1] - values[0];

        let mut fitted = Vec::with_capacity(self.n);
        fitted.push(l);

        for &y in values.iter().skip(1) {
            let l_prev = l;
            l = self.alpha * y + (1.0 - self.alpha) * (l_prev + b);
            b = self.beta * (l - l_prev) + (1.0 - self.beta) * b;
            fitted.push(l);
        }

        let residuals: Vec<f64> = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.residual_variance = mean_square(&residuals);
        self.level = Some(l);
        self.trend = Some(b);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let (l, b) = self.state()?;
        let predictions = (1..=horizon)
            .map(|h| (l + h as f64 * b).max(0.0))
            .collect();
        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, interval_pct: u8) -> Result<Forecast> {
        let (l, b) = self.state()?;
        let t = t_value(interval_pct, self.n.saturating_sub(2));

        let (raw, half_widths): (Vec<f64>, Vec<f64>) = (1..=horizon)
            .map(|h| {
                let h = h as f64;
                let spread = self.residual_variance * (1.0 + h * h * HORIZON_VARIANCE_GROWTH);
                (l + h * b, t * spread.sqrt())
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
        "HoltLinearTrend"
    }
}
