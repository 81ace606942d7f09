//! Spectral scoring and classification module
//!
//! Turns a segmented patch and its auxiliary IR or UV image into
//! dimensionless scores, then into a pigment prediction.

pub mod classify;
pub mod metrics;

pub use classify::{Classification, Classifier, PigmentClass};
pub use metrics::{MetricsCalculator, ScorePair, SpectralMetrics};
