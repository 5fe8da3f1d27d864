//! Automatic model selection by chronological holdout validation.

use crate::core::{ForecastConfig, ModelScore, ModelType};
use crate::models::build_model;
use crate::utils::cross_validation::{holdout_score, DEFAULT_TRAIN_FRACTION};
use tracing::{debug, info};

/// Outcome of a selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Best-scoring candidate, `None` when every candidate failed to fit.
    pub best: Option<ModelType>,
    /// Holdout score of every candidate, in candidate order.
    pub scores: Vec<ModelScore>,
}

/// Scores the linear, exponential and seasonal models on a holdout split.
///
/// Each candidate is fitted on the first 80% of the series and scored by
/// `max(0, 1 - MAPE)` on the rest. A candidate that fails scores 0. Ties go
/// to the earlier candidate.
#[derive(Debug, Clone)]
pub struct ModelSelector {
    seasonal_period: usize,
    train_fraction: f64,
    include_seasonal: bool,
}

impl ModelSelector {
    pub fn new(seasonal_period: usize) -> Self {
        Self {
            seasonal_period,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            include_seasonal: true,
        }
    }

    /// Selector matching a forecast configuration.
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.seasonality_period_days).with_seasonality(config.include_seasonality)
    }

    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction;
        self
    }

    /// Whether the seasonal model takes part.
    pub fn with_seasonality(mut self, include: bool) -> Self {
        self.include_seasonal = include;
        self
    }

    /// Candidate models in tie-breaking order.
    pub fn candidates(&self) -> Vec<ModelType> {
        ModelType::CANDIDATES
            .into_iter()
            .filter(|&m| self.include_seasonal || m != ModelType::Seasonal)
            .collect()
    }

    /// Score every candidate on `values` and pick the best.
    pub fn select(&self, values: &[f64]) -> Selection {
        let mut scores = Vec::new();
        let mut best: Option<(ModelType, f64)> = None;

        for candidate in self.candidates() {
            let outcome = build_model(candidate, self.seasonal_period)
                .map(|mut model| holdout_score(values, self.train_fraction, model.as_mut()));

            let score = match outcome {
                Some(Ok(result)) => {
                    if best.map_or(true, |(_, s)| result.score > s) {
                        best = Some((candidate, result.score));
                    }
                    result.score
                }
                Some(Err(err)) => {
                    debug!(model = %candidate, error = %err, "candidate failed during selection");
                    0.0
                }
                None => 0.0,
            };
            debug!(model = %candidate, score, "holdout score");
            scores.push(ModelScore {
                model: candidate,
                score,
            });
        }

        let best = best.map(|(model, _)| model);
        match best {
            Some(model) => info!(model = %model, "selected forecasting model"),
            None => info!("no candidate model could be fitted"),
        }
        Selection { best, scores }
    }
}
