//! Metrics, statistics and splitting utilities.

pub mod metrics;
pub mod stats;
pub mod temporal_split;

pub use metrics::{score, MetricValue, MetricsBundle, UndefinedReason};
pub use temporal_split::{TemporalSplit, TemporalSplitter};
