//! Global chronological train/test splitting across all entities.
//!
//! Rows of every entity are sorted together by timestamp and cut at a single
//! index, so the boundary is one point in time shared by all entities. Entities
//! can therefore contribute different numbers of rows to each side.

use crate::core::Timestamped;
use crate::error::{EvalError, Result};
use chrono::{DateTime, Utc};

/// Splits rows at `floor(train_fraction * len)` after a global time sort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalSplitter {
    train_fraction: f64,
}

/// Output of [`TemporalSplitter::split`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSplit<T> {
    /// Rows before the cutoff index, in chronological order.
    pub train: Vec<T>,
    /// Rows at and after the cutoff index, in chronological order.
    pub test: Vec<T>,
}

impl<T: Timestamped> TemporalSplit<T> {
    /// Timestamp of the first test row, shared by every entity.
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.test.first().map(T::timestamp)
    }
}

impl TemporalSplitter {
    /// Create a splitter; `train_fraction` must lie strictly between 0 and 1.
    pub fn new(train_fraction: f64) -> Result<Self> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(EvalError::InvalidParameter(format!(
                "train fraction must be in (0, 1), got {train_fraction}"
            )));
        }
        Ok(Self { train_fraction })
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    /// Index of the first test row for a table of `len` rows.
    pub fn cutoff_index(&self, len: usize) -> usize {
        (self.train_fraction * len as f64).floor() as usize
    }

    /// Sort all rows by timestamp (stable) and cut them in two.
    pub fn split<T: Timestamped>(&self, mut rows: Vec<T>) -> TemporalSplit<T> {
        rows.sort_by_key(|row| row.timestamp());
        let test = rows.split_off(self.cutoff_index(rows.len()));
        TemporalSplit { train: rows, test }
    }
}

impl Default for TemporalSplitter {
    fn default() -> Self {
        Self {
            train_fraction: 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Observation;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn rejects_fractions_outside_open_interval() {
        for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TemporalSplitter::new(bad),
                Err(EvalError::InvalidParameter(_))
            ));
        }
        assert_eq!(TemporalSplitter::new(0.6).unwrap().train_fraction(), 0.6);
        assert_eq!(TemporalSplitter::default().train_fraction(), 0.75);
    }

    #[test]
    fn hundred_mixed_rows_split_75_25() {
        // four entities with uneven lengths and offsets, input grouped by entity
        let mut rows = Vec::new();
        for (entity, len, offset) in [("a", 40, 0), ("b", 30, 5), ("c", 20, 12), ("d", 10, 30)] {
            for i in 0..len {
                rows.push(Observation::new(entity, day(offset + i), i as f64));
            }
        }
        assert_eq!(rows.len(), 100);

        let split = TemporalSplitter::new(0.75).unwrap().split(rows);
        assert_eq!(split.train.len(), 75);
        assert_eq!(split.test.len(), 25);

        let cutoff = split.cutoff().unwrap();
        assert!(split.train.iter().all(|r| r.timestamp() <= cutoff));
        assert!(split.test.iter().all(|r| r.timestamp() >= cutoff));

        // entities do not get the same share on each side
        let mut test_counts: HashMap<&str, usize> = HashMap::new();
        for row in &split.test {
            *test_counts.entry(row.entity_id()).or_default() += 1;
        }
        assert_ne!(test_counts.get("a"), test_counts.get("d"));
    }

    #[test]
    fn cutoff_floors() {
        let splitter = TemporalSplitter::new(0.75).unwrap();
        assert_eq!(splitter.cutoff_index(0), 0);
        assert_eq!(splitter.cutoff_index(1), 0);
        assert_eq!(splitter.cutoff_index(3), 2);
        assert_eq!(splitter.cutoff_index(10), 7);
        assert_eq!(splitter.cutoff_index(100), 75);
    }

    #[test]
    fn split_sorts_globally_and_keeps_tie_order() {
        let rows = vec![
            Observation::new("a", day(2), 1.0),
            Observation::new("b", day(0), 2.0),
            Observation::new("a", day(1), 3.0),
            Observation::new("b", day(1), 4.0),
        ];
        let split = TemporalSplitter::new(0.5).unwrap().split(rows);

        let train: Vec<f64> = split.train.iter().map(|o| o.price()).collect();
        let test: Vec<f64> = split.test.iter().map(|o| o.price()).collect();
        assert_eq!(train, vec![2.0, 3.0]);
        assert_eq!(test, vec![4.0, 1.0]);
        assert_eq!(split.cutoff(), Some(day(1)));
    }

    #[test]
    fn empty_input_gives_empty_partitions() {
        let split = TemporalSplitter::default().split(Vec::<Observation>::new());
        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
        assert_eq!(split.cutoff(), None);
    }
}
