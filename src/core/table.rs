//! The cleaned multi-entity table and its validation from raw string cells.

use crate::core::observation::{parse_timestamp, Observation, Timestamped};
use crate::error::{EvalError, Result};
use std::collections::{BTreeSet, HashSet};

/// Names of the three columns every raw table must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub entity: String,
    pub timestamp: String,
    pub price: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            entity: "entity_id".to_string(),
            timestamp: "timestamp".to_string(),
            price: "price".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, name: impl Into<String>) -> Self {
        self.entity = name.into();
        self
    }

    pub fn with_timestamp(mut self, name: impl Into<String>) -> Self {
        self.timestamp = name.into();
        self
    }

    pub fn with_price(mut self, name: impl Into<String>) -> Self {
        self.price = name.into();
        self
    }
}

/// Header plus string cells, as handed over by a CSV reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.trim() == name)
            .ok_or_else(|| EvalError::MissingColumn(name.to_string()))
    }
}

/// Validated observations of every entity, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelTable {
    observations: Vec<Observation>,
}

impl PanelTable {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Validate a raw table. The first invalid row aborts the conversion.
    ///
    /// Row numbers in errors are 1-based and count data rows only.
    pub fn from_raw(raw: &RawTable, names: &ColumnNames) -> Result<Self> {
        let entity_idx = raw.column_index(&names.entity)?;
        let ts_idx = raw.column_index(&names.timestamp)?;
        let price_idx = raw.column_index(&names.price)?;

        let extra: Vec<(usize, &str)> = raw
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| ![entity_idx, ts_idx, price_idx].contains(i))
            .map(|(i, name)| (i, name.trim()))
            .collect();

        let mut observations = Vec::with_capacity(raw.rows.len());
        for (i, cells) in raw.rows.iter().enumerate() {
            let row = i + 1;
            if cells.len() != raw.columns.len() {
                return Err(EvalError::RaggedRow {
                    row,
                    expected: raw.columns.len(),
                    got: cells.len(),
                });
            }

            let entity_id = cells[entity_idx].trim();
            if entity_id.is_empty() {
                return Err(EvalError::EmptyEntityId { row });
            }

            let timestamp =
                parse_timestamp(&cells[ts_idx]).ok_or_else(|| EvalError::InvalidTimestamp {
                    row,
                    value: cells[ts_idx].clone(),
                })?;

            let price = parse_number(&cells[price_idx]).ok_or_else(|| EvalError::InvalidPrice {
                row,
                value: cells[price_idx].clone(),
            })?;

            let mut obs = Observation::new(entity_id, timestamp, price);
            for &(idx, name) in &extra {
                if let Some(value) = parse_number(&cells[idx]) {
                    obs = obs.with_covariate(name, value);
                }
            }
            observations.push(obs);
        }

        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct entity ids in order of first appearance.
    pub fn entity_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|obs| seen.insert(obs.entity_id()))
            .map(|obs| obs.entity_id().to_string())
            .collect()
    }

    /// Keep only the rows of the named entities.
    pub fn retain_entities(&self, entities: &BTreeSet<String>) -> Self {
        Self {
            observations: self
                .observations
                .iter()
                .filter(|obs| entities.contains(obs.entity_id()))
                .cloned()
                .collect(),
        }
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
