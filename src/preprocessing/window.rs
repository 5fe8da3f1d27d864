//! Noise detection and centered moving-average smoothing.

use crate::core::CostObservation;
use std::collections::BTreeMap;

/// Mean relative day-over-day change above which a series is noisy.
pub const NOISE_THRESHOLD: f64 = 0.20;

/// Default smoothing window.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// Average of `|cost[i] - cost[i-1]| / cost[i-1]` over consecutive pairs.
///
/// Pairs starting from a zero cost have no relative change and are skipped.
pub fn noise_level(series: &[CostObservation]) -> f64 {
    let changes: Vec<f64> = series
        .windows(2)
        .filter(|pair| pair[0].total_cost > 0.0)
        .map(|pair| (pair[1].total_cost - pair[0].total_cost).abs() / pair[0].total_cost)
        .collect();

    if changes.is_empty() {
        0.0
    } else {
        changes.iter().sum::<f64>() / changes.len() as f64
    }
}

/// Whether the series' [`noise_level`] exceeds [`NOISE_THRESHOLD`].
pub fn detect_noise(series: &[CostObservation]) -> bool {
    noise_level(series) > NOISE_THRESHOLD
}

/// Centered moving average of total and per-service costs.
///
/// The first and last `window / 2` points are copied unchanged. Every
/// service seen anywhere in the window is averaged; a service absent from
/// a point counts as zero there.
pub fn smooth(series: &[CostObservation], window: usize) -> Vec<CostObservation> {
    let n = series.len();
    let half = window / 2;
    if window < 2 || n < window {
        return series.to_vec();
    }

    let mut smoothed = series.to_vec();
    for i in half..n - half {
        let start = i - half;
        let end = start + window;
        let neighbours = &series[start..end];
        let width = neighbours.len() as f64;

        let total = neighbours.iter().map(|o| o.total_cost).sum::<f64>() / width;
        let mut services: BTreeMap<String, f64> = BTreeMap::new();
        for obs in neighbours {
            for (service, cost) in &obs.service_costs {
                *services.entry(service.clone()).or_insert(0.0) += cost;
            }
        }
        for cost in services.values_mut() {
            *cost /= width;
        }

        smoothed[i].total_cost = total;
        smoothed[i].service_costs = services;
    }
    smoothed
}
