//! Model-level forecast output: point predictions with optional intervals.

use crate::error::{ForecastError, Result};

/// A univariate forecast produced by a single model.
///
/// Dates are attached later by the engine; a `Forecast` only knows steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    /// Point predictions, one per step.
    point: Vec<f64>,
    /// Lower prediction interval bounds (optional).
    lower: Option<Vec<f64>>,
    /// Upper prediction interval bounds (optional).
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Self {
        Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Build a non-negative forecast from raw predictions and interval half-widths.
    ///
    /// Predictions are clamped to zero first, then the interval is laid around
    /// the clamped value so that `lower <= point <= upper` always holds.
    pub fn from_half_widths(raw: &[f64], half_widths: &[f64]) -> Result<Self> {
        if raw.len() != half_widths.len() {
            return Err(ForecastError::ComputationError(format!(
                "interval length {} does not match horizon {}",
                half_widths.len(),
                raw.len()
            )));
        }

        let mut point = Vec::with_capacity(raw.len());
        let mut lower = Vec::with_capacity(raw.len());
        let mut upper = Vec::with_capacity(raw.len());

        for (&pred, &half) in raw.iter().zip(half_widths) {
            if !pred.is_finite() {
                return Err(ForecastError::ComputationError(
                    "non-finite prediction".to_string(),
                ));
            }
            let pred = pred.max(0.0);
            let half = if half.is_finite() { half.abs() } else { 0.0 };
            point.push(pred);
            lower.push((pred - half).max(0.0));
            upper.push(pred + half);
        }

        Ok(Self::from_values_with_intervals(point, lower, upper))
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    /// Check if intervals are available.
    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Lower bounds, falling back to the point predictions.
    pub fn lower(&self) -> &[f64] {
        self.lower.as_deref().unwrap_or(&self.point)
    }

    /// Upper bounds, falling back to the point predictions.
    pub fn upper(&self) -> &[f64] {
        self.upper.as_deref().unwrap_or(&self.point)
    }

    /// Multiply point and both bounds at `step` by `factor`.
    pub fn scale_step(&mut self, step: usize, factor: f64) {
        if let Some(p) = self.point.get_mut(step) {
            *p *= factor;
        }
        if let Some(l) = self.lower.as_mut().and_then(|l| l.get_mut(step)) {
            *l *= factor;
        }
        if let Some(u) = self.upper.as_mut().and_then(|u| u.get_mut(step)) {
            *u *= factor;
        }
    }
}
