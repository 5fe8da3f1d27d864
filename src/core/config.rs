//! Per-run forecast configuration.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prediction interval levels accepted by [`ForecastConfig`].
pub const SUPPORTED_INTERVALS: [u8; 4] = [80, 90, 95, 99];

/// Which forecasting model a run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    /// Ordinary least squares trend.
    Linear,
    /// Holt's linear exponential smoothing.
    Exponential,
    /// Seasonal decomposition with an OLS trend.
    Seasonal,
    /// Accuracy-weighted combination of the three models above.
    Ensemble,
    /// Pick the best single model by holdout validation.
    Auto,
}

impl ModelType {
    /// Candidates evaluated by automatic selection, in tie-break order.
    pub const CANDIDATES: [ModelType; 3] =
        [ModelType::Linear, ModelType::Exponential, ModelType::Seasonal];
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelType::Linear => "linear",
            ModelType::Exponential => "exponential",
            ModelType::Seasonal => "seasonal",
            ModelType::Ensemble => "ensemble",
            ModelType::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Configuration for a single forecast run.
///
/// Field names serialize in camelCase so a configuration can be loaded
/// from the same JSON shape the exporters use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
    /// Number of future days to forecast.
    pub forecast_days: usize,
    /// Prediction interval width in percent (80, 90, 95 or 99).
    pub prediction_interval_pct: u8,
    /// Model to run.
    pub model_type: ModelType,
    /// Length of the seasonal cycle in days.
    pub seasonality_period_days: usize,
    pub include_seasonality: bool,
    pub include_business_events: bool,
    pub include_growth_trends: bool,
    /// Minimum number of raw observations required.
    pub min_data_points: usize,
    /// Z-score beyond which an observation is treated as an outlier.
    pub outlier_threshold_std_dev: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            forecast_days: 30,
            prediction_interval_pct: 95,
            model_type: ModelType::Auto,
            seasonality_period_days: 7,
            include_seasonality: true,
            include_business_events: true,
            include_growth_trends: true,
            min_data_points: 14,
            outlier_threshold_std_dev: 2.0,
        }
    }
}

impl ForecastConfig {
    /// Create a configuration for the given horizon with default settings.
    pub fn new(forecast_days: usize) -> Self {
        Self {
            forecast_days,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the model type.
    pub fn with_model(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    /// Set the prediction interval percentage.
    pub fn with_prediction_interval(mut self, pct: u8) -> Self {
        self.prediction_interval_pct = pct;
        self
    }

    /// Set the seasonal period in days.
    pub fn with_seasonality_period(mut self, days: usize) -> Self {
        self.seasonality_period_days = days;
        self
    }

    pub fn with_seasonality(mut self, include: bool) -> Self {
        self.include_seasonality = include;
        self
    }

    pub fn with_business_events(mut self, include: bool) -> Self {
        self.include_business_events = include;
        self
    }

    pub fn with_growth_trends(mut self, include: bool) -> Self {
        self.include_growth_trends = include;
        self
    }

    /// Set the minimum number of observations.
    pub fn with_min_data_points(mut self, min: usize) -> Self {
        self.min_data_points = min;
        self
    }

    /// Set the outlier z-score threshold.
    pub fn with_outlier_threshold(mut self, std_devs: f64) -> Self {
        self.outlier_threshold_std_dev = std_devs;
        self
    }

    /// Confidence attached to each forecasted point.
    pub fn confidence(&self) -> f64 {
        f64::from(self.prediction_interval_pct) / 100.0
    }

    /// Check that every field is within its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.forecast_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast_days must be positive".to_string(),
            ));
        }
        if !SUPPORTED_INTERVALS.contains(&self.prediction_interval_pct) {
            return Err(ForecastError::InvalidParameter(format!(
                "prediction_interval_pct must be one of {:?}, got {}",
                SUPPORTED_INTERVALS, self.prediction_interval_pct
            )));
        }
        if self.seasonality_period_days < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonality_period_days must be at least 2, got {}",
                self.seasonality_period_days
            )));
        }
        if !self.outlier_threshold_std_dev.is_finite() || self.outlier_threshold_std_dev <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "outlier_threshold_std_dev must be finite and positive, got {}",
                self.outlier_threshold_std_dev
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ForecastConfig::default();
        assert_eq!(config.forecast_days, 30);
        assert_eq!(config.prediction_interval_pct, 95);
        assert_eq!(config.model_type, ModelType::Auto);
        assert_eq!(config.seasonality_period_days, 7);
        assert_eq!(config.min_data_points, 14);
        assert_eq!(config.outlier_threshold_std_dev, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_chain() {
        let config = ForecastConfig::new(10)
            .with_model(ModelType::Linear)
            .with_prediction_interval(80)
            .with_seasonality(false)
            .with_min_data_points(5);
        assert_eq!(config.forecast_days, 10);
        assert_eq!(config.model_type, ModelType::Linear);
        assert!((config.confidence() - 0.8).abs() < 1e-12);
        assert!(!config.include_seasonality);
        assert_eq!(config.min_data_points, 5);
    }

    #[test]
    fn validation_rejects_out_of_range_fields() {
        assert!(ForecastConfig::new(0).validate().is_err());
        assert!(ForecastConfig::new(5)
            .with_prediction_interval(85)
            .validate()
            .is_err());
        assert!(ForecastConfig::new(5)
            .with_seasonality_period(1)
            .validate()
            .is_err());
        assert!(ForecastConfig::new(5)
            .with_outlier_threshold(f64::NAN)
            .validate()
            .is_err());
        assert!(ForecastConfig::new(5)
            .with_outlier_threshold(0.0)
            .validate()
            .is_err());
        assert!(ForecastConfig::new(5)
            .with_outlier_threshold(0.5)
            .validate()
            .is_ok());
    }

    #[test]
    fn json_config_fills_defaults() {
        let config =
            ForecastConfig::from_json_str(r#"{"forecastDays": 14, "modelType": "SEASONAL"}"#)
                .unwrap();
        assert_eq!(config.forecast_days, 14);
        assert_eq!(config.model_type, ModelType::Seasonal);
        assert_eq!(config.prediction_interval_pct, 95);
        assert!(config.include_business_events);
    }

    #[test]
    fn json_config_is_validated() {
        let err = ForecastConfig::from_json_str(r#"{"forecastDays": 0}"#).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
        let err = ForecastConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ForecastError::Serialization(_)));
    }

    #[test]
    fn model_type_display() {
        assert_eq!(ModelType::Exponential.to_string(), "exponential");
        assert_eq!(ModelType::CANDIDATES[0], ModelType::Linear);
    }
}
