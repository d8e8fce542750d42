//! Single rows of a multi-entity price panel.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// Anything positioned in time and owned by one entity.
pub trait Timestamped {
    fn entity_id(&self) -> &str;
    fn timestamp(&self) -> DateTime<Utc>;
}

/// One row of the cleaned table: an entity's price at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    entity_id: String,
    timestamp: DateTime<Utc>,
    price: f64,
    covariates: BTreeMap<String, f64>,
}

impl Observation {
    pub fn new(entity_id: impl Into<String>, timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp,
            price,
            covariates: BTreeMap::new(),
        }
    }

    /// Attach an extra numeric column.
    pub fn with_covariate(mut self, name: impl Into<String>, value: f64) -> Self {
        self.covariates.insert(name.into(), value);
        self
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn covariates(&self) -> &BTreeMap<String, f64> {
        &self.covariates
    }

    pub fn covariate(&self, name: &str) -> Option<f64> {
        self.covariates.get(name).copied()
    }
}

impl Timestamped for Observation {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp cell.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// and bare `YYYY-MM-DD` dates (midnight UTC). Naive values are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
