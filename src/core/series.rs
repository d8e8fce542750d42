//! Per-entity chronological views over a panel table.

use crate::core::observation::{Observation, Timestamped};
use crate::core::table::PanelTable;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// The observations of a single entity, sorted by timestamp.
///
/// Built by [`EntitySeries::group`]; owns copies of its rows so that rolling
/// computations over one entity can never read another entity's data.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    entity_id: String,
    observations: Vec<Observation>,
}

impl EntitySeries {
    /// Partition a table by entity id and sort each partition by timestamp.
    ///
    /// Series come back in order of each entity's first appearance. The sort
    /// is stable, so rows sharing a timestamp keep their input order.
    pub fn group(table: &PanelTable) -> Vec<EntitySeries> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<EntitySeries> = Vec::new();

        for obs in table.observations() {
            let slot = *index.entry(obs.entity_id()).or_insert_with(|| {
                groups.push(EntitySeries {
                    entity_id: obs.entity_id().to_string(),
                    observations: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].observations.push(obs.clone());
        }

        for series in &mut groups {
            series.observations.sort_by_key(|obs| obs.timestamp());
        }
        groups
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
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

    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(Observation::price).collect()
    }

    /// Timestamps that occur more than once, with their multiplicity.
    pub fn duplicate_timestamps(&self) -> Vec<(DateTime<Utc>, usize)> {
        let mut duplicates = Vec::new();
        let mut i = 0;
        while i < self.observations.len() {
            let ts = self.observations[i].timestamp();
            let run = self.observations[i..]
                .iter()
                .take_while(|obs| obs.timestamp() == ts)
                .count();
            if run > 1 {
                duplicates.push((ts, run));
            }
            i += run;
        }
        duplicates
    }
}
