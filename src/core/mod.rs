//! Core data structures for cost forecasting.

mod config;
mod forecast;
mod observation;
mod result;

pub use config::{ForecastConfig, ModelType, SUPPORTED_INTERVALS};
pub use forecast::Forecast;
pub use observation::{
    days_between, service_names, sorted_by_timestamp, total_costs, validate_observations,
    CostObservation, ObservationMetadata,
};
pub use result::{ForecastResult, ForecastedPoint, ModelScore};
