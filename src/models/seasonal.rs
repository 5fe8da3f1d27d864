//! Seasonal decomposition forecaster.
//!
//! Splits the series into multiplicative per-phase factors and a linear
//! trend fitted on the deseasonalized values. Series shorter than two full
//! cycles are forecast with Holt's method instead.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use crate::models::exponential::HoltLinearTrend;
use crate::models::Forecaster;
use crate::utils::ols::{fit_trend, TrendFit};
use crate::utils::stats::{mean, t_value};
use tracing::debug;

/// Default cycle length in days.
pub const DEFAULT_PERIOD: usize = 7;

#[derive(Debug, Clone)]
enum SeasonalState {
    Decomposed {
        trend: TrendFit,
        factors: Vec<f64>,
        fitted: Vec<f64>,
        residuals: Vec<f64>,
    },
    /// Fewer than two cycles of data.
    HoltFallback(HoltLinearTrend),
}

/// Multiplicative seasonal decomposition with an OLS trend.
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    period: usize,
    state: Option<SeasonalState>,
}

impl SeasonalDecomposition {
    /// Create a model for cycles of `period` days (minimum 2).
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(2),
            state: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Per-phase seasonal factors, `None` before fitting or on the Holt fallback.
    pub fn seasonal_factors(&self) -> Option<&[f64]> {
        match &self.state {
            Some(SeasonalState::Decomposed { factors, .. }) => Some(factors),
            _ => None,
        }
    }

    /// Whether the last fit fell back to Holt's method.
    pub fn is_fallback(&self) -> bool {
        matches!(self.state, Some(SeasonalState::HoltFallback(_)))
    }

    /// Average each phase and divide by the overall mean.
    ///
    /// An all-zero series has no seasonal signal; every factor is then 1.
    fn seasonal_factors_of(values: &[f64], period: usize) -> Vec<f64> {
        let overall = mean(values);
        if overall.abs() < f64::EPSILON {
            return vec![1.0; period];
        }
        (0..period)
            .map(|phase| {
                let phase_values: Vec<f64> =
                    values.iter().skip(phase).step_by(period).copied().collect();
                mean(&phase_values) / overall
            })
            .collect()
    }

    fn deseasonalize(values: &[f64], factors: &[f64]) -> Vec<f64> {
        let period = factors.len();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let factor = factors[i % period];
                // A zero factor means the whole phase is zero.
                if factor.abs() < f64::EPSILON {
                    v
                } else {
                    v / factor
                }
            })
            .collect()
    }
}

impl Default for SeasonalDecomposition {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl Forecaster for SeasonalDecomposition {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        self.state = None;

        if values.len() < 2 * self.period {
            debug!(
                points = values.len(),
                period = self.period,
                "series shorter than two cycles, using Holt's method"
            );
            let mut holt = HoltLinearTrend::new();
            holt.fit(values)?;
            self.state = Some(SeasonalState::HoltFallback(holt));
            return Ok(());
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(
                "seasonal decomposition received non-finite values".to_string(),
            ));
        }

        let factors = Self::seasonal_factors_of(values, self.period);
        let deseasonalized = Self::deseasonalize(values, &factors);
        let trend = fit_trend(&deseasonalized)?;

        let fitted: Vec<f64> = (0..values.len())
            .map(|i| trend.value_at(i as f64) * factors[i % self.period])
            .collect();
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.state = Some(SeasonalState::Decomposed {
            trend,
            factors,
            fitted,
            residuals,
        });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        match self.state.as_ref().ok_or(ForecastError::FitRequired)? {
            SeasonalState::HoltFallback(holt) => holt.predict(horizon),
            SeasonalState::Decomposed { trend, factors, .. } => {
                let predictions = (1..=horizon)
                    .map(|h| {
                        let f = trend.n + h - 1;
                        (trend.value_at(f as f64) * factors[f % self.period]).max(0.0)
                    })
                    .collect();
                Ok(Forecast::from_values(predictions))
            }
        }
    }

    fn predict_with_intervals(&self, horizon: usize, interval_pct: u8) -> Result<Forecast> {
        match self.state.as_ref().ok_or(ForecastError::FitRequired)? {
            SeasonalState::HoltFallback(holt) => holt.predict_with_intervals(horizon, interval_pct),
            SeasonalState::Decomposed { trend, factors, .. } => {
                let t = t_value(interval_pct, trend.degrees_of_freedom());
                let sigma = trend.standard_error();

                let (raw, half_widths): (Vec<f64>, Vec<f64>) = (1..=horizon)
                    .map(|h| {
                        let f = trend.n + h - 1;
                        let factor = factors[f % self.period];
                        (trend.value_at(f as f64) * factor, t * sigma * factor)
                    })
                    .unzip();

                Forecast::from_half_widths(&raw, &half_widths)
            }
        }
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        match self.state.as_ref()? {
            SeasonalState::HoltFallback(holt) => holt.fitted_values(),
            SeasonalState::Decomposed { fitted, .. } => Some(fitted),
        }
    }

    fn residuals(&self) -> Option<&[f64]> {
        match self.state.as_ref()? {
            SeasonalState::HoltFallback(holt) => holt.residuals(),
            SeasonalState::Decomposed { residuals, .. } => Some(residuals),
        }
    }

    fn name(&self) -> &str {
        "SeasonalDecomposition"
    }
}
