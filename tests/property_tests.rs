//! Property-based tests for the forecasting models and the full pipeline.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated daily cost series.

use chrono::{Duration, TimeZone, Utc};
use cloud_cost_forecast::core::{CostObservation, ForecastConfig, ModelType};
use cloud_cost_forecast::models::{
    Ensemble, Forecaster, HoltLinearTrend, LinearRegression, SeasonalDecomposition,
};
use cloud_cost_forecast::ForecastingSession;
use proptest::prelude::*;

fn observations(values: &[f64]) -> Vec<CostObservation> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| CostObservation::new(base + Duration::days(i as i64), v))
        .collect()
}

/// Strategy for generating valid daily costs.
fn cost_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| prop::collection::vec(1.0..1000.0_f64, len))
}

/// Strategy for generating a cost series with trend.
fn trending_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        (10.0..500.0_f64, -2.0..5.0_f64).prop_map(move |(base, slope)| {
            (0..len)
                .map(|i| (base + slope * i as f64).max(0.0))
                .collect()
        })
    })
}

/// Strategy for generating a weekly-seasonal cost series.
fn seasonal_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        (50.0..100.0_f64, 5.0..20.0_f64).prop_map(move |(base, amplitude)| {
            (0..len)
                .map(|i| base + amplitude * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin())
                .collect()
        })
    })
}

fn models() -> Vec<Box<dyn Forecaster>> {
    vec![
        Box::new(LinearRegression::new()) as Box<dyn Forecaster>,
        Box::new(HoltLinearTrend::new()),
        Box::new(SeasonalDecomposition::new(7)),
        Box::new(Ensemble::standard(7, true)),
    ]
}

// =============================================================================
// Property: Forecast length matches requested horizon
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn model_forecast_length_matches_horizon(
        values in cost_values_strategy(14, 80),
        horizon in 1usize..40
    ) {
        for mut model in models() {
            model.fit(&values).unwrap();
            let forecast = model.predict_with_intervals(horizon, 95).unwrap();
            prop_assert_eq!(forecast.horizon(), horizon, "{}", model.name());
        }
    }

    #[test]
    fn engine_forecast_length_matches_config(
        values in cost_values_strategy(14, 60),
        days in 1usize..60
    ) {
        let session = ForecastingSession::new().with_observations(observations(&values));
        let result = session.generate_forecast(&ForecastConfig::new(days)).unwrap();
        prop_assert_eq!(result.forecasted_costs.len(), days);
    }
}

// =============================================================================
// Property: Bounds are ordered and non-negative
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn model_intervals_contain_point(
        values in trending_values_strategy(14, 60),
        pct in prop::sample::select(vec![80u8, 90, 95, 99])
    ) {
        for mut model in models() {
            model.fit(&values).unwrap();
            let forecast = model.predict_with_intervals(20, pct).unwrap();
            for h in 0..20 {
                prop_assert!(forecast.primary()[h] >= 0.0);
                prop_assert!(forecast.lower()[h] >= 0.0);
                prop_assert!(forecast.lower()[h] <= forecast.primary()[h]);
                prop_assert!(forecast.primary()[h] <= forecast.upper()[h]);
            }
        }
    }

    #[test]
    fn engine_points_are_ordered(
        values in seasonal_values_strategy(14, 60),
        model in prop::sample::select(vec![
            ModelType::Linear,
            ModelType::Exponential,
            ModelType::Seasonal,
            ModelType::Ensemble,
            ModelType::Auto,
        ])
    ) {
        let session = ForecastingSession::new().with_observations(observations(&values));
        let config = ForecastConfig::new(21).with_model(model);
        let result = session.generate_forecast(&config).unwrap();

        for point in &result.forecasted_costs {
            prop_assert!(point.predicted_cost >= 0.0);
            prop_assert!(point.lower_bound >= 0.0);
            prop_assert!(point.lower_bound <= point.predicted_cost);
            prop_assert!(point.predicted_cost <= point.upper_bound);
            prop_assert_eq!(point.confidence, 0.95);
        }
        prop_assert!((0.0..=1.0).contains(&result.model_accuracy));
        prop_assert!(result.mean_absolute_error.is_finite() && result.mean_absolute_error >= 0.0);
        prop_assert!(result.root_mean_square_error.is_finite() && result.root_mean_square_error >= 0.0);
        prop_assert!(result.r_squared.is_finite());
    }
}

// =============================================================================
// Property: Runs are deterministic
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn identical_input_gives_identical_output(values in cost_values_strategy(14, 50)) {
        let session = ForecastingSession::new().with_observations(observations(&values));
        let config = ForecastConfig::new(14);

        let first = session.generate_forecast(&config).unwrap();
        let second = session.generate_forecast(&config).unwrap();
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn constant_series_forecasts_its_level(level in 1.0..1000.0_f64, len in 14usize..40) {
        let values = vec![level; len];
        for mut model in [
            Box::new(LinearRegression::new()) as Box<dyn Forecaster>,
            Box::new(HoltLinearTrend::new()),
        ] {
            model.fit(&values).unwrap();
            for &p in model.predict(10).unwrap().primary() {
                prop_assert!((p - level).abs() < 1e-6 * level);
            }
        }
    }
}
