//! Exponential smoothing models.

mod holt;

pub use holt::{HoltLinearTrend, DEFAULT_ALPHA, DEFAULT_BETA};
