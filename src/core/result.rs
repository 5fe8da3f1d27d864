//! The forecast result handed back to callers and exporters.

use crate::core::ModelType;
use crate::error::Result;
use crate::insights::Insights;
use crate::quality::DataQuality;
use crate::recommendations::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One forecasted day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastedPoint {
    pub date: DateTime<Utc>,
    pub predicted_cost: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: f64,
}

/// Holdout score a candidate model achieved during automatic selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelScore {
    pub model: ModelType,
    pub score: f64,
}

/// Complete output of a forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub forecasted_costs: Vec<ForecastedPoint>,
    pub model_accuracy: f64,
    pub mean_absolute_error: f64,
    pub root_mean_square_error: f64,
    pub r_squared: f64,
    pub insights: Insights,
    pub recommendations: Vec<Recommendation>,
    pub data_quality: DataQuality,
    /// Model that produced `forecasted_costs`.
    pub model_used: ModelType,
    /// Selection scores, present only when automatic selection ran.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_scores: Vec<ModelScore>,
}

impl ForecastResult {
    /// Sum of predicted costs over the horizon.
    pub fn total_predicted_cost(&self) -> f64 {
        self.forecasted_costs.iter().map(|p| p.predicted_cost).sum()
    }

    /// Largest upper bound over the horizon, zero for an empty forecast.
    pub fn peak_upper_bound(&self) -> f64 {
        self.forecasted_costs
            .iter()
            .map(|p| p.upper_bound)
            .fold(0.0, f64::max)
    }

    /// Render the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
