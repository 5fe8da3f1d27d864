//! # cloud-cost-forecast
//!
//! Daily cloud cost forecasting.
//!
//! Cleans a series of per-day cost observations, forecasts it with a
//! linear trend, Holt's exponential smoothing, a seasonal decomposition or
//! an accuracy-weighted ensemble of the three, and derives trend insights,
//! recommendations and data quality scores from the result.
//!
//! ```
//! use cloud_cost_forecast::prelude::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let session = ForecastingSession::new().with_observations(
//!     (0..28).map(|i| CostObservation::new(start + Duration::days(i), 100.0 + i as f64)),
//! );
//!
//! let result = session.generate_forecast(&ForecastConfig::new(7)).unwrap();
//! assert_eq!(result.forecasted_costs.len(), 7);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod insights;
pub mod models;
pub mod preprocessing;
pub mod quality;
pub mod recommendations;
pub mod selection;
pub mod utils;

pub use engine::ForecastingSession;
pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{CostObservation, ForecastConfig, ForecastResult, ModelType};
    pub use crate::engine::ForecastingSession;
    pub use crate::error::{ForecastError, Result};
    pub use crate::events::{BusinessEvent, EventImpact};
    pub use crate::models::Forecaster;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
