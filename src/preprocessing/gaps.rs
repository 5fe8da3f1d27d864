//! Gap detection and linear interpolation of missing days.

use crate::core::{days_between, CostObservation};
use chrono::Duration;
use std::collections::BTreeMap;

/// Consecutive observations farther apart than this many days form a gap.
pub const MAX_GAP_DAYS: f64 = 1.5;

/// Number of consecutive pairs more than [`MAX_GAP_DAYS`] apart.
pub fn count_gaps(series: &[CostObservation]) -> usize {
    series
        .windows(2)
        .filter(|pair| days_between(pair[0].timestamp, pair[1].timestamp) > MAX_GAP_DAYS)
        .count()
}

/// Fill gaps with synthetic daily observations.
///
/// A gap of `g` days receives `floor(g) - 1` points spaced one day apart
/// from the left neighbour. Total and per-service costs are interpolated
/// linearly in time; a service missing on one side counts as zero there.
/// Synthetic points carry the left neighbour's metadata.
pub fn interpolate_missing_data(series: &[CostObservation]) -> Vec<CostObservation> {
    let mut filled = Vec::with_capacity(series.len());

    for pair in series.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        filled.push(left.clone());

        let gap = days_between(left.timestamp, right.timestamp);
        if gap <= MAX_GAP_DAYS {
            continue;
        }

        let missing = gap.floor() as i64 - 1;
        for step in 1..=missing {
            let fraction = step as f64 / gap;
            let lerp = |a: f64, b: f64| a + (b - a) * fraction;

            let service_costs: BTreeMap<String, f64> = left
                .service_costs
                .keys()
                .chain(right.service_costs.keys())
                .map(|service| {
                    let cost = lerp(left.service_cost(service), right.service_cost(service));
                    (service.clone(), cost)
                })
                .collect();

            filled.push(CostObservation {
                timestamp: left.timestamp + Duration::days(step),
                total_cost: lerp(left.total_cost, right.total_cost),
                service_costs,
                metadata: left.metadata.clone(),
            });
        }
    }

    if let Some(last) = series.last() {
        filled.push(last.clone());
    }
    filled
}
