//! Ensemble forecasting methods.
//!
//! Combines the individual cost models for improved robustness.

mod model;

pub use model::{ensemble_weights, Ensemble};
