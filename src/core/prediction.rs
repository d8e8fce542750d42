//! One-step-ahead predictions paired with the observed value.

use crate::core::observation::Timestamped;
use chrono::{DateTime, Utc};

/// An observed price and the forecast made for it from strictly earlier data.
///
/// Only produced by forecasters; there is no public constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    entity_id: String,
    timestamp: DateTime<Utc>,
    actual: f64,
    predicted: f64,
}

impl PredictionRecord {
    pub(crate) fn new(
        entity_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        actual: f64,
        predicted: f64,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp,
            actual,
            predicted,
        }
    }

    pub fn actual(&self) -> f64 {
        self.actual
    }

    pub fn predicted(&self) -> f64 {
        self.predicted
    }

    /// Signed error, actual minus predicted.
    pub fn error(&self) -> f64 {
        self.actual - self.predicted
    }
}

impl Timestamped for PredictionRecord {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
