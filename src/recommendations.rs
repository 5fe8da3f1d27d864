//! Actionable recommendations derived from a forecast and its insights.

use crate::core::{ForecastConfig, ForecastedPoint};
use crate::insights::{Insights, TrendDirection};
use crate::utils::stats::mean;
use serde::{Deserialize, Serialize};

/// Days compared by the budget check.
pub const BUDGET_WINDOW_DAYS: usize = 30;
/// Forecast-to-actual ratio above which the budget needs adjusting.
pub const BUDGET_INCREASE_RATIO: f64 = 1.2;
/// Volatility above which a cost review is recommended.
pub const VOLATILITY_THRESHOLD: f64 = 0.3;
/// Share of a projected increase assumed recoverable by planning ahead.
pub const PLANNING_SAVINGS_RATE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    BudgetAdjustment,
    CostOptimization,
    ResourcePlanning,
    AlertThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// A single recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<f64>,
    pub implementation_effort: Effort,
    pub timeline: String,
}

/// Run every recommendation check; checks are independent.
///
/// `history` is the cleaned daily cost series the forecast was fitted on.
pub fn generate_recommendations(
    history: &[f64],
    forecast: &[ForecastedPoint],
    insights: &Insights,
    config: &ForecastConfig,
) -> Vec<Recommendation> {
    let trailing = &history[history.len().saturating_sub(BUDGET_WINDOW_DAYS)..];
    let actual_avg = mean(trailing);
    let predicted: Vec<f64> = forecast.iter().map(|p| p.predicted_cost).collect();

    let mut recommendations = Vec::new();
    recommendations.extend(budget_adjustment(&predicted, actual_avg));
    recommendations.extend(cost_optimization(insights));
    if config.include_growth_trends {
        recommendations.extend(resource_planning(&predicted, actual_avg, insights));
    }
    recommendations.push(alert_threshold(forecast));
    recommendations
}

fn budget_adjustment(predicted: &[f64], actual_avg: f64) -> Option<Recommendation> {
    let window = &predicted[..predicted.len().min(BUDGET_WINDOW_DAYS)];
    let forecast_avg = mean(window);
    if window.is_empty() || forecast_avg <= BUDGET_INCREASE_RATIO * actual_avg {
        return None;
    }

    let monthly_delta = (forecast_avg - actual_avg) * BUDGET_WINDOW_DAYS as f64;
    Some(Recommendation {
        kind: RecommendationType::BudgetAdjustment,
        title: "Increase budget allocation".to_string(),
        description: format!(
            "Forecasted daily spend of {:.2} exceeds the trailing average of {:.2} by more than 20%; \
             raise the monthly budget by about {:.2}",
            forecast_avg, actual_avg, monthly_delta
        ),
        priority: Priority::High,
        potential_savings: None,
        implementation_effort: Effort::Low,
        timeline: "Immediate".to_string(),
    })
}

fn cost_optimization(insights: &Insights) -> Option<Recommendation> {
    if insights.volatility <= VOLATILITY_THRESHOLD {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationType::CostOptimization,
        title: "Review volatile spending".to_string(),
        description: format!(
            "Daily costs vary by {:.0}% around their mean; review usage patterns \
             and consider reserved capacity or autoscaling limits",
            insights.volatility * 100.0
        ),
        priority: Priority::Medium,
        potential_savings: None,
        implementation_effort: Effort::Medium,
        timeline: "1-2 weeks".to_string(),
    })
}

fn resource_planning(
    predicted: &[f64],
    actual_avg: f64,
    insights: &Insights,
) -> Option<Recommendation> {
    if insights.trend_direction != TrendDirection::Increasing {
        return None;
    }

    let baseline = actual_avg * predicted.len() as f64;
    let projected_increase = (predicted.iter().sum::<f64>() - baseline).max(0.0);
    Some(Recommendation {
        kind: RecommendationType::ResourcePlanning,
        title: "Plan capacity for cost growth".to_string(),
        description: format!(
            "Costs are growing {:.1}% half over half; plan capacity and commitments \
             for a projected increase of {:.2} over the forecast horizon",
            insights.growth_rate_pct, projected_increase
        ),
        priority: Priority::Medium,
        potential_savings: Some(PLANNING_SAVINGS_RATE * projected_increase),
        implementation_effort: Effort::High,
        timeline: "1-3 months".to_string(),
    })
}

fn alert_threshold(forecast: &[ForecastedPoint]) -> Recommendation {
    let threshold = forecast.iter().map(|p| p.upper_bound).fold(0.0, f64::max);
    Recommendation {
        kind: RecommendationType::AlertThreshold,
        title: "Set cost alert threshold".to_string(),
        description: format!(
            "Alert when daily spend exceeds {:.2}, the highest upper bound in the forecast",
            threshold
        ),
        priority: Priority::Low,
        potential_savings: None,
        implementation_effort: Effort::Low,
        timeline: "Ongoing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn points(costs: &[f64]) -> Vec<ForecastedPoint> {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        costs
            .iter()
            .enumerate()
            .map(|(i, &c)| ForecastedPoint {
                date: start + Duration::days(i as i64),
                predicted_cost: c,
                lower_bound: c * 0.9,
                upper_bound: c * 1.1,
                confidence: 0.95,
            })
            .collect()
    }

    fn kinds(recs: &[Recommendation]) -> Vec<RecommendationType> {
        recs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn flat_costs_only_get_an_alert() {
        let recs = generate_recommendations(
            &[100.0; 30],
            &points(&[100.0; 10]),
            &Insights::default(),
            &ForecastConfig::default(),
        );
        assert_eq!(kinds(&recs), vec![RecommendationType::AlertThreshold]);
        assert_eq!(recs[0].priority, Priority::Low);
        assert!(recs[0].description.contains("110.00"));
    }

    #[test]
    fn rising_costs_trigger_budget_and_planning() {
        let insights = Insights {
            trend_direction: TrendDirection::Increasing,
            growth_rate_pct: 40.0,
            ..Default::default()
        };
        let recs = generate_recommendations(
            &[100.0; 60],
            &points(&[130.0; 10]),
            &insights,
            &ForecastConfig::default(),
        );

        assert_eq!(
            kinds(&recs),
            vec![
                RecommendationType::BudgetAdjustment,
                RecommendationType::ResourcePlanning,
                RecommendationType::AlertThreshold,
            ]
        );
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[0].potential_savings, None);
        // 10 days at 30 over the trailing average.
        assert_relative_eq!(recs[1].potential_savings.unwrap(), 0.15 * 300.0, epsilon = 1e-9);
    }

    #[test]
    fn growth_recommendation_can_be_disabled() {
        let insights = Insights {
            trend_direction: TrendDirection::Increasing,
            ..Default::default()
        };
        let config = ForecastConfig::default().with_growth_trends(false);
        let recs = generate_recommendations(&[100.0; 30], &points(&[100.0; 5]), &insights, &config);
        assert!(!kinds(&recs).contains(&RecommendationType::ResourcePlanning));
    }

    #[test]
    fn volatile_costs_trigger_review() {
        let insights = Insights {
            volatility: 0.45,
            ..Default::default()
        };
        let recs = generate_recommendations(
            &[100.0; 30],
            &points(&[100.0; 5]),
            &insights,
            &ForecastConfig::default(),
        );
        assert_eq!(recs[0].kind, RecommendationType::CostOptimization);
        assert_eq!(recs[0].priority, Priority::Medium);
    }

    #[test]
    fn type_field_is_named_type() {
        let recs = generate_recommendations(
            &[1.0],
            &points(&[1.0]),
            &Insights::default(),
            &ForecastConfig::default(),
        );
        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["type"], "ALERT_THRESHOLD");
        assert_eq!(json["implementationEffort"], "LOW");
        assert!(json.get("potentialSavings").is_none());
    }
}
