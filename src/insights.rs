//! Trend, volatility, seasonality and cost-driver insights.

use crate::core::{service_names, CostObservation};
use crate::utils::stats::{autocorrelation, coefficient_of_variation, half_over_half_growth_pct};
use serde::{Deserialize, Serialize};

/// Growth below this many percent (either way) is a stable trend.
pub const STABLE_GROWTH_PCT: f64 = 5.0;
/// Stability threshold for per-service trends, in percent.
pub const DRIVER_STABLE_GROWTH_PCT: f64 = 10.0;
/// Lag used to look for a weekly pattern.
pub const SEASONAL_LAG: usize = 7;
/// Fewest points on which seasonality is assessed.
pub const MIN_SEASONAL_POINTS: usize = 14;
/// Autocorrelation above which the series is called seasonal.
pub const SEASONAL_ACF_THRESHOLD: f64 = 0.3;
/// Services below this share of total spend are not cost drivers.
pub const MIN_DRIVER_IMPACT: f64 = 0.01;
/// Most cost drivers reported.
pub const MAX_COST_DRIVERS: usize = 10;

/// Direction of a cost trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl TrendDirection {
    /// Classify a growth rate given the stability band in percent.
    pub fn from_growth(growth_pct: f64, stable_band_pct: f64) -> Self {
        if growth_pct.abs() < stable_band_pct {
            TrendDirection::Stable
        } else if growth_pct > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

/// A service's share of spend and its own trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostDriver {
    pub service: String,
    /// Share of total spend in `(0, 1]`.
    pub impact_score: f64,
    pub trend: TrendDirection,
}

/// Descriptive insights derived from the cleaned series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub trend_direction: TrendDirection,
    /// `min(1, |growth| / 50)`.
    pub trend_strength: f64,
    pub seasonal_pattern: bool,
    pub growth_rate_pct: f64,
    /// Coefficient of variation clamped to `[0, 1]`.
    pub volatility: f64,
    pub cost_drivers: Vec<CostDriver>,
}

/// Derive insights from a cleaned, timestamp-sorted series.
pub fn generate_insights(series: &[CostObservation]) -> Insights {
    let totals: Vec<f64> = series.iter().map(|o| o.total_cost).collect();
    let growth = half_over_half_growth_pct(&totals);

    Insights {
        trend_direction: TrendDirection::from_growth(growth, STABLE_GROWTH_PCT),
        trend_strength: (growth.abs() / 50.0).min(1.0),
        seasonal_pattern: detect_seasonal_pattern(&totals),
        growth_rate_pct: growth,
        volatility: coefficient_of_variation(&totals).clamp(0.0, 1.0),
        cost_drivers: cost_drivers(series),
    }
}

/// Lag-7 autocorrelation test for a weekly pattern.
pub fn detect_seasonal_pattern(values: &[f64]) -> bool {
    values.len() >= MIN_SEASONAL_POINTS
        && autocorrelation(values, SEASONAL_LAG) > SEASONAL_ACF_THRESHOLD
}

/// Services ranked by share of total spend, largest first, at most ten.
pub fn cost_drivers(series: &[CostObservation]) -> Vec<CostDriver> {
    let total: f64 = series.iter().map(|o| o.total_cost).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut drivers: Vec<CostDriver> = service_names(series)
        .into_iter()
        .filter_map(|service| {
            let costs: Vec<f64> = series.iter().map(|o| o.service_cost(&service)).collect();
            let impact = costs.iter().sum::<f64>() / total;
            (impact > MIN_DRIVER_IMPACT).then(|| CostDriver {
                trend: TrendDirection::from_growth(
                    half_over_half_growth_pct(&costs),
                    DRIVER_STABLE_GROWTH_PCT,
                ),
                impact_score: impact.min(1.0),
                service,
            })
        })
        .collect();

    drivers.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
    drivers.truncate(MAX_COST_DRIVERS);
    drivers
}
