//! Forecasting models.

mod traits;

pub mod baseline;
pub mod ensemble;
pub mod exponential;
pub mod linear;
pub mod seasonal;

pub use ensemble::Ensemble;
pub use exponential::HoltLinearTrend;
pub use linear::LinearRegression;
pub use seasonal::SeasonalDecomposition;
pub use traits::{build_model, run_model, BoxedForecaster, Forecaster, ModelRun};
