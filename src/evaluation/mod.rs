//! Run-level orchestration: forecasting every entity, splitting and reporting.

mod pipeline;
mod report;

pub use pipeline::{BaselineEvaluator, Evaluation, EvaluationConfig};
pub use report::{EntityMetrics, Report, ReportAggregator};
