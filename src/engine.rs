//! Forecasting session: accumulated observations and the forecast pipeline.
//!
//! A run validates the configuration, cleans the series, fits the requested
//! (or automatically selected) model, applies business events and fills in
//! insights, recommendations and data quality.

use crate::core::{
    service_names, sorted_by_timestamp, total_costs, validate_observations, CostObservation,
    Forecast, ForecastConfig, ForecastResult, ForecastedPoint, ModelScore, ModelType,
};
use crate::error::{ForecastError, Result};
use crate::events::{apply_business_events, BusinessEvent};
use crate::insights::generate_insights;
use crate::models::{build_model, run_model, BoxedForecaster, Ensemble, ModelRun};
use crate::preprocessing::preprocess;
use crate::quality::assess_data_quality;
use crate::recommendations::generate_recommendations;
use crate::selection::ModelSelector;
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Observation history and known business events for one cost source.
///
/// The session is the only state that outlives a forecast run. It has a
/// single writer; forecast runs only read it, so per-service runs can share
/// it across threads.
#[derive(Debug, Clone, Default)]
pub struct ForecastingSession {
    observations: Vec<CostObservation>,
    events: Vec<BusinessEvent>,
}

impl ForecastingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append observations.
    pub fn with_observations(mut self, observations: impl IntoIterator<Item = CostObservation>) -> Self {
        self.observations.extend(observations);
        self
    }

    /// Register a business event.
    pub fn with_event(mut self, event: BusinessEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn push_observation(&mut self, observation: CostObservation) {
        self.observations.push(observation);
    }

    pub fn push_event(&mut self, event: BusinessEvent) {
        self.events.push(event);
    }

    /// Observations in insertion order.
    pub fn observations(&self) -> &[CostObservation] {
        &self.observations
    }

    pub fn events(&self) -> &[BusinessEvent] {
        &self.events
    }

    /// Forecast total cost.
    ///
    /// # Errors
    /// `InsufficientData` when fewer than `config.min_data_points`
    /// observations are held; `InvalidParameter` for an invalid
    /// configuration or negative costs.
    pub fn generate_forecast(&self, config: &ForecastConfig) -> Result<ForecastResult> {
        forecast_series(&self.observations, &self.events, config)
    }

    /// Forecast every service separately, in parallel.
    ///
    /// Each run sees only the observations carrying that service, with the
    /// service's cost as the total. Runs that would start once `deadline`
    /// has elapsed fail with `DeadlineExceeded`.
    pub fn forecast_by_service(
        &self,
        config: &ForecastConfig,
        deadline: Option<std::time::Duration>,
    ) -> BTreeMap<String, Result<ForecastResult>> {
        let started = Instant::now();
        let services: Vec<String> = service_names(&self.observations).into_iter().collect();
        info!(services = services.len(), "starting per-service forecasts");

        let results: BTreeMap<String, Result<ForecastResult>> = services
            .into_par_iter()
            .map(|service| {
                if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                    warn!(service = %service, "deadline exceeded, skipping service");
                    let err = ForecastError::DeadlineExceeded {
                        service: service.clone(),
                    };
                    return (service, Err(err));
                }
                let series = service_series(&self.observations, &service);
                let result = forecast_series(&series, &self.events, config);
                (service, result)
            })
            .collect();

        let failed = results.values().filter(|r| r.is_err()).count();
        info!(
            services = results.len(),
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "finished per-service forecasts"
        );
        results
    }
}

/// Observations carrying `service`, re-expressed with the service cost as
/// the total.
pub fn service_series(observations: &[CostObservation], service: &str) -> Vec<CostObservation> {
    observations
        .iter()
        .filter_map(|obs| {
            obs.service_costs.get(service).map(|&cost| CostObservation {
                timestamp: obs.timestamp,
                total_cost: cost,
                service_costs: BTreeMap::new(),
                metadata: obs.metadata.clone(),
            })
        })
        .collect()
}

/// Run the full forecast pipeline on `observations`.
pub fn forecast_series(
    observations: &[CostObservation],
    events: &[BusinessEvent],
    config: &ForecastConfig,
) -> Result<ForecastResult> {
    config.validate()?;
    if observations.len() < config.min_data_points {
        return Err(ForecastError::InsufficientData {
            needed: config.min_data_points,
            got: observations.len(),
        });
    }
    if observations.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    validate_observations(observations)?;

    info!(
        points = observations.len(),
        days = config.forecast_days,
        model = %config.model_type,
        "generating forecast"
    );

    let sorted = sorted_by_timestamp(observations);
    let cleaned = preprocess(&sorted, config.outlier_threshold_std_dev).observations;
    let values = total_costs(&cleaned);

    let (mut run, model_scores) = fit_forecast(&values, config)?;

    let last = cleaned
        .last()
        .map(|o| o.timestamp)
        .ok_or(ForecastError::EmptyData)?;
    let dates = forecast_dates(last, config.forecast_days);

    if config.include_business_events && !events.is_empty() {
        apply_business_events(&mut run.forecast, &dates, events);
    }

    let forecasted_costs = to_points(&run.forecast, &dates, config.confidence());
    let insights = generate_insights(&cleaned);
    let recommendations = generate_recommendations(&values, &forecasted_costs, &insights, config);
    let data_quality = assess_data_quality(&sorted, config.outlier_threshold_std_dev)?;

    debug!(
        model = %run.model,
        accuracy = run.accuracy,
        recommendations = recommendations.len(),
        "forecast complete"
    );

    Ok(ForecastResult {
        forecasted_costs,
        model_accuracy: run.accuracy,
        mean_absolute_error: run.metrics.mae,
        root_mean_square_error: run.metrics.rmse,
        r_squared: run.metrics.r_squared,
        insights,
        recommendations,
        data_quality,
        model_used: run.model,
        model_scores,
    })
}

/// Unfitted model for `model_type`, honouring the seasonality switch for
/// the ensemble.
fn model_for(model_type: ModelType, config: &ForecastConfig) -> Option<BoxedForecaster> {
    match model_type {
        ModelType::Ensemble => Some(Box::new(Ensemble::standard(
            config.seasonality_period_days,
            config.include_seasonality,
        ))),
        other => build_model(other, config.seasonality_period_days),
    }
}

fn run_model_type(model_type: ModelType, values: &[f64], config: &ForecastConfig) -> Result<ModelRun> {
    let mut model = model_for(model_type, config).ok_or_else(|| {
        ForecastError::InvalidParameter(format!("no model for model type {}", model_type))
    })?;
    run_model(
        model_type,
        model.as_mut(),
        values,
        config.forecast_days,
        config.prediction_interval_pct,
    )
}

/// Fit the configured model, falling back to the ensemble when it fails.
fn fit_forecast(values: &[f64], config: &ForecastConfig) -> Result<(ModelRun, Vec<ModelScore>)> {
    let (model_type, scores) = match config.model_type {
        ModelType::Auto => {
            let selection = ModelSelector::from_config(config).select(values);
            let model = selection.best.unwrap_or_else(|| {
                warn!("every candidate failed selection, using the ensemble");
                ModelType::Ensemble
            });
            (model, selection.scores)
        }
        explicit => (explicit, Vec::new()),
    };

    if model_type == ModelType::Ensemble {
        return Ok((run_model_type(ModelType::Ensemble, values, config)?, scores));
    }

    match run_model_type(model_type, values, config) {
        Ok(model_run) => Ok((model_run, scores)),
        Err(err) => {
            warn!(model = %model_type, error = %err, "model failed, using the ensemble");
            Ok((run_model_type(ModelType::Ensemble, values, config)?, scores))
        }
    }
}

/// `last + 1 day`, `last + 2 days`, ... for `horizon` days.
pub fn forecast_dates(last: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    (1..=horizon as i64).map(|h| last + Duration::days(h)).collect()
}

fn to_points(forecast: &Forecast, dates: &[DateTime<Utc>], confidence: f64) -> Vec<ForecastedPoint> {
    dates
        .iter()
        .zip(forecast.primary())
        .zip(forecast.lower().iter().zip(forecast.upper()))
        .map(|((&date, &predicted), (&lower, &upper))| ForecastedPoint {
            date,
            predicted_cost: predicted.max(0.0),
            lower_bound: lower.max(0.0).min(predicted.max(0.0)),
            upper_bound: upper.max(predicted.max(0.0)),
            confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn daily(costs: &[f64]) -> Vec<CostObservation> {
        costs
            .iter()
            .enumerate()
            .map(|(i, &c)| CostObservation::new(start() + Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn dates_follow_last_observation() {
        let dates = forecast_dates(start(), 3);
        assert_eq!(dates[0], start() + Duration::days(1));
        assert_eq!(dates[2], start() + Duration::days(3));
    }

    #[test]
    fn too_few_points_is_fatal() {
        let session = ForecastingSession::new().with_observations(daily(&[10.0; 10]));
        let err = session
            .generate_forecast(&ForecastConfig::default())
            .unwrap_err();
        assert_eq!(err, ForecastError::InsufficientData { needed: 14, got: 10 });
    }

    #[test]
    fn empty_session_with_zero_minimum() {
        let config = ForecastConfig::default().with_min_data_points(0);
        assert_eq!(
            ForecastingSession::new().generate_forecast(&config),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn negative_cost_is_rejected() {
        let mut costs = vec![10.0; 14];
        costs[3] = -1.0;
        let session = ForecastingSession::new().with_observations(daily(&costs));
        assert!(matches!(
            session.generate_forecast(&ForecastConfig::default()),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let mut obs = daily(&(0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        obs.reverse();
        let session = ForecastingSession::new().with_observations(obs);
        let result = session
            .generate_forecast(&ForecastConfig::new(5).with_model(ModelType::Linear))
            .unwrap();

        assert_eq!(result.forecasted_costs[0].date, start() + Duration::days(20));
        assert!(result.forecasted_costs[0].predicted_cost > 118.0);
    }

    #[test]
    fn failing_explicit_model_uses_ensemble() {
        // Two points: linear regression needs three.
        let config = ForecastConfig::new(3)
            .with_model(ModelType::Linear)
            .with_min_data_points(2);
        let session = ForecastingSession::new().with_observations(daily(&[10.0, 12.0]));
        let result = session.generate_forecast(&config).unwrap();

        assert_eq!(result.model_used, ModelType::Ensemble);
        assert_eq!(result.forecasted_costs.len(), 3);
    }

    #[test]
    fn service_series_keeps_only_carrying_observations() {
        let obs = vec![
            CostObservation::new(start(), 10.0).with_service("ec2", 7.0),
            CostObservation::new(start() + Duration::days(1), 5.0).with_service("s3", 5.0),
        ];
        let series = service_series(&obs, "ec2");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total_cost, 7.0);
        assert!(series[0].service_costs.is_empty());
    }

    #[test]
    fn zero_deadline_skips_every_service() {
        let obs: Vec<CostObservation> = (0..20)
            .map(|i| {
                CostObservation::new(start() + Duration::days(i), 30.0)
                    .with_service("ec2", 20.0)
                    .with_service("s3", 10.0)
            })
            .collect();
        let session = ForecastingSession::new().with_observations(obs);
        let results =
            session.forecast_by_service(&ForecastConfig::new(7), Some(std::time::Duration::ZERO));

        assert_eq!(results.len(), 2);
        assert!(matches!(
            results["ec2"],
            Err(ForecastError::DeadlineExceeded { ref service }) if service == "ec2"
        ));
    }
}
