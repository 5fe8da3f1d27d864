//! Daily cost observations supplied by the caller.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Provider context attached to an observation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationMetadata {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// One day of infrastructure cost, optionally broken down by service.
///
/// Service costs live in a `BTreeMap` so that every derived quantity
/// iterates services in the same order on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostObservation {
    pub timestamp: DateTime<Utc>,
    pub total_cost: f64,
    #[serde(default)]
    pub service_costs: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObservationMetadata>,
}

impl CostObservation {
    pub fn new(timestamp: DateTime<Utc>, total_cost: f64) -> Self {
        Self {
            timestamp,
            total_cost,
            service_costs: BTreeMap::new(),
            metadata: None,
        }
    }

    pub fn with_service(mut self, service: impl Into<String>, cost: f64) -> Self {
        self.service_costs.insert(service.into(), cost);
        self
    }

    pub fn with_metadata(mut self, metadata: ObservationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Cost of `service` on this day, zero when absent.
    pub fn service_cost(&self, service: &str) -> f64 {
        self.service_costs.get(service).copied().unwrap_or(0.0)
    }
}

/// Copy and sort observations by timestamp (stable for equal timestamps).
pub fn sorted_by_timestamp(observations: &[CostObservation]) -> Vec<CostObservation> {
    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.timestamp);
    sorted
}

/// Extract the `total_cost` column.
pub fn total_costs(observations: &[CostObservation]) -> Vec<f64> {
    observations.iter().map(|o| o.total_cost).collect()
}

/// Fractional number of days from `from` to `to`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Every service name appearing anywhere in the series, in sorted order.
pub fn service_names(observations: &[CostObservation]) -> BTreeSet<String> {
    observations
        .iter()
        .flat_map(|o| o.service_costs.keys().cloned())
        .collect()
}

/// Reject negative or non-finite costs.
pub fn validate_observations(observations: &[CostObservation]) -> Result<()> {
    for obs in observations {
        let valid = |c: f64| c.is_finite() && c >= 0.0;
        if !valid(obs.total_cost) {
            return Err(ForecastError::InvalidParameter(format!(
                "total cost at {} must be finite and non-negative, got {}",
                obs.timestamp, obs.total_cost
            )));
        }
        if let Some((service, cost)) = obs.service_costs.iter().find(|(_, &c)| !valid(c)) {
            return Err(ForecastError::InvalidParameter(format!(
                "cost of service '{}' at {} must be finite and non-negative, got {}",
                service, obs.timestamp, cost
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i)
    }

    #[test]
    fn sorting_is_ascending_and_leaves_input_alone() {
        let input = vec![
            CostObservation::new(day(2), 3.0),
            CostObservation::new(day(0), 1.0),
            CostObservation::new(day(1), 2.0),
        ];
        let sorted = sorted_by_timestamp(&input);
        assert_eq!(total_costs(&sorted), vec![1.0, 2.0, 3.0]);
        assert_eq!(input[0].total_cost, 3.0);
    }

    #[test]
    fn days_between_is_fractional() {
        let start = day(0);
        let end = start + Duration::hours(36);
        assert!((days_between(start, end) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn service_names_are_unioned() {
        let obs = vec![
            CostObservation::new(day(0), 3.0).with_service("compute", 2.0),
            CostObservation::new(day(1), 3.0).with_service("storage", 1.0),
        ];
        let names: Vec<_> = service_names(&obs).into_iter().collect();
        assert_eq!(names, vec!["compute".to_string(), "storage".to_string()]);
        assert_eq!(obs[0].service_cost("storage"), 0.0);
    }

    #[test]
    fn validation_rejects_bad_costs() {
        assert!(validate_observations(&[CostObservation::new(day(0), -1.0)]).is_err());
        assert!(validate_observations(&[CostObservation::new(day(0), f64::NAN)]).is_err());
        let bad_service = CostObservation::new(day(0), 1.0).with_service("db", f64::INFINITY);
        assert!(validate_observations(&[bad_service]).is_err());
        assert!(validate_observations(&[CostObservation::new(day(0), 0.0)]).is_ok());
    }

    #[test]
    fn observation_json_uses_camel_case() {
        let obs = CostObservation::new(day(0), 12.5).with_service("compute", 10.0);
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"totalCost\":12.5"));
        assert!(json.contains("\"serviceCosts\""));
        let back: CostObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}
