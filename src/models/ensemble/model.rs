//! Accuracy-weighted ensemble of the linear, Holt and seasonal models.

use crate::core::{Forecast, ModelType};
use crate::error::{ForecastError, Result};
use crate::models::baseline::Naive;
use crate::models::{build_model, BoxedForecaster, Forecaster};
use crate::utils::metrics::AccuracyMetrics;
use tracing::warn;

/// Weights proportional to `accuracies`.
///
/// When every accuracy is zero the weights are an equal split rounded to two
/// decimals, with the rounding remainder on the last member; for three
/// members this is `[0.33, 0.33, 0.34]`.
///
/// # Example
/// ```
/// use cloud_cost_forecast::models::ensemble::ensemble_weights;
///
/// assert_eq!(ensemble_weights(&[0.0, 0.0, 0.0]), vec![0.33, 0.33, 0.34]);
/// assert_eq!(ensemble_weights(&[0.5, 0.5]), vec![0.5, 0.5]);
/// ```
pub fn ensemble_weights(accuracies: &[f64]) -> Vec<f64> {
    let k = accuracies.len();
    if k == 0 {
        return Vec::new();
    }

    let total: f64 = accuracies.iter().sum();
    if total > 0.0 && total.is_finite() {
        return accuracies.iter().map(|a| a / total).collect();
    }

    let share = 100 / k;
    let last = 100 - share * (k - 1);
    let mut weights = vec![share as f64 / 100.0; k - 1];
    weights.push(last as f64 / 100.0);
    weights
}

struct Member {
    model: ModelType,
    forecaster: BoxedForecaster,
    /// In-sample accuracy; `None` when the member failed to fit.
    accuracy: Option<f64>,
}

/// Ensemble forecaster combining member forecasts by in-sample accuracy.
///
/// Point predictions and both interval bounds are weighted sums of the
/// members'. Fit metrics are plain (unweighted) means of the members'
/// metrics. Members that fail to fit are left out; if none fit, the
/// ensemble repeats the last observation.
pub struct Ensemble {
    members: Vec<Member>,
    weights: Vec<f64>,
    fallback: Option<Naive>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl Ensemble {
    /// Create an ensemble over the given models.
    pub fn new(models: Vec<(ModelType, BoxedForecaster)>) -> Self {
        let members = models
            .into_iter()
            .map(|(model, forecaster)| Member {
                model,
                forecaster,
                accuracy: None,
            })
            .collect();
        Self {
            members,
            weights: Vec::new(),
            fallback: None,
            fitted: None,
            residuals: None,
        }
    }

    /// The standard linear + exponential (+ seasonal) ensemble.
    pub fn standard(seasonal_period: usize, include_seasonal: bool) -> Self {
        let models = ModelType::CANDIDATES
            .into_iter()
            .filter(|&m| include_seasonal || m != ModelType::Seasonal)
            .filter_map(|m| build_model(m, seasonal_period).map(|f| (m, f)))
            .collect();
        Self::new(models)
    }

    /// Weights of the members that fitted, in member order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Models that fitted successfully, in member order.
    pub fn fitted_models(&self) -> Vec<ModelType> {
        self.survivors().map(|m| m.model).collect()
    }

    /// Whether no member could be fitted and the naive forecast is used.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn survivors(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.accuracy.is_some())
    }

    /// Weighted sum of member forecasts; weights are renormalized over
    /// the members that produced a forecast.
    fn combine(parts: &[(f64, Forecast)]) -> Forecast {
        let horizon = parts.first().map(|(_, f)| f.horizon()).unwrap_or(0);
        let total: f64 = parts.iter().map(|(w, _)| w).sum();
        let weight = |w: f64| {
            if total > 0.0 {
                w / total
            } else {
                1.0 / parts.len() as f64
            }
        };

        let mut point = vec![0.0; horizon];
        let mut lower = vec![0.0; horizon];
        let mut upper = vec![0.0; horizon];
        for (w, forecast) in parts {
            let w = weight(*w);
            for h in 0..horizon {
                point[h] += w * forecast.primary()[h];
                lower[h] += w * forecast.lower()[h];
                upper[h] += w * forecast.upper()[h];
            }
        }
        Forecast::from_values_with_intervals(point, lower, upper)
    }

    fn weighted_forecasts<F>(&self, predict: F) -> Vec<(f64, Forecast)>
    where
        F: Fn(&dyn Forecaster) -> Result<Forecast>,
    {
        self.survivors()
            .zip(&self.weights)
            .filter_map(|(member, &w)| match predict(member.forecaster.as_ref()) {
                Ok(forecast) => Some((w, forecast)),
                Err(err) => {
                    warn!(model = %member.model, error = %err, "ensemble member failed to predict");
                    None
                }
            })
            .collect()
    }
}

impl Forecaster for Ensemble {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        self.weights.clear();
        self.fallback = None;
        self.fitted = None;
        self.residuals = None;

        for member in &mut self.members {
            let outcome = member
                .forecaster
                .fit(values)
                .and_then(|_| member.forecaster.in_sample_accuracy(values));
            member.accuracy = match outcome {
                Ok(accuracy) => Some(accuracy),
                Err(err) => {
                    warn!(model = %member.model, error = %err, "ensemble member failed to fit");
                    None
                }
            };
        }

        let accuracies: Vec<f64> = self.survivors().filter_map(|m| m.accuracy).collect();
        if accuracies.is_empty() {
            warn!(points = values.len(), "no ensemble member fitted, using naive forecast");
            let mut naive = Naive::new();
            naive.fit(values)?;
            self.fitted = naive.fitted_values().map(<[f64]>::to_vec);
            self.residuals = naive.residuals().map(<[f64]>::to_vec);
            self.fallback = Some(naive);
            return Ok(());
        }

        self.weights = ensemble_weights(&accuracies);

        let mut combined = vec![0.0; values.len()];
        for (member, &w) in self.survivors().zip(&self.weights) {
            if let Some(fitted) = member.forecaster.fitted_values() {
                for (c, f) in combined.iter_mut().zip(fitted) {
                    *c += w * f;
                }
            }
        }
        self.residuals = Some(values.iter().zip(&combined).map(|(y, f)| y - f).collect());
        self.fitted = Some(combined);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        if let Some(naive) = &self.fallback {
            return naive.predict(horizon);
        }
        let parts = self.weighted_forecasts(|m| m.predict(horizon));
        if parts.is_empty() {
            return Err(ForecastError::FitRequired);
        }
        Ok(Forecast::from_values(Self::combine(&parts).primary().to_vec()))
    }

    fn predict_with_intervals(&self, horizon: usize, interval_pct: u8) -> Result<Forecast> {
        if let Some(naive) = &self.fallback {
            return naive.predict_with_intervals(horizon, interval_pct);
        }
        let parts = self.weighted_forecasts(|m| m.predict_with_intervals(horizon, interval_pct));
        if parts.is_empty() {
            return Err(ForecastError::FitRequired);
        }
        Ok(Self::combine(&parts))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "Ensemble"
    }

    fn in_sample_metrics(&self, actual: &[f64]) -> Result<AccuracyMetrics> {
        if let Some(naive) = &self.fallback {
            return naive.in_sample_metrics(actual);
        }
        let metrics = self
            .survivors()
            .map(|m| m.forecaster.in_sample_metrics(actual))
            .collect::<Result<Vec<_>>>()?;
        if metrics.is_empty() {
            return Err(ForecastError::FitRequired);
        }

        let n = metrics.len() as f64;
        let avg = |f: fn(&AccuracyMetrics) -> f64| metrics.iter().map(f).sum::<f64>() / n;
        Ok(AccuracyMetrics {
            mae: avg(|m| m.mae),
            mse: avg(|m| m.mse),
            rmse: avg(|m| m.rmse),
            mape: avg(|m| m.mape),
            r_squared: avg(|m| m.r_squared),
        })
    }

    fn in_sample_accuracy(&self, actual: &[f64]) -> Result<f64> {
        if let Some(naive) = &self.fallback {
            return naive.in_sample_accuracy(actual);
        }
        let accuracies: Vec<f64> = self.survivors().filter_map(|m| m.accuracy).collect();
        if accuracies.is_empty() {
            return Err(ForecastError::FitRequired);
        }
        Ok(accuracies.iter().sum::<f64>() / accuracies.len() as f64)
    }
}
