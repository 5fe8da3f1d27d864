//! Utility functions for forecasting models.

pub mod cross_validation;
pub mod metrics;
pub mod ols;
pub mod stats;

pub use cross_validation::{holdout_score, holdout_split, HoldoutResult, DEFAULT_TRAIN_FRACTION};
pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use ols::{fit_trend, TrendFit};
pub use stats::t_value;
