//! Overall and per-entity scoring of the test partition.

use crate::core::{PredictionRecord, Timestamped};
use crate::error::Result;
use crate::utils::metrics::{score, MetricsBundle, UndefinedReason};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Metrics of one entity over its test rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetrics {
    pub entity_id: String,
    /// Number of test rows scored; zero means the metrics are a placeholder.
    pub observations: usize,
    pub metrics: MetricsBundle,
}

/// Scores for one run: the whole test partition plus every entity, ranked by MAE.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    overall: MetricsBundle,
    observations: usize,
    entities: Vec<EntityMetrics>,
}

impl Report {
    pub fn overall(&self) -> &MetricsBundle {
        &self.overall
    }

    /// Number of test rows behind the overall metrics.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Entities ascending by MAE, undefined MAE last.
    pub fn entities(&self) -> &[EntityMetrics] {
        &self.entities
    }

    pub fn entity(&self, entity_id: &str) -> Option<&EntityMetrics> {
        self.entities.iter().find(|e| e.entity_id == entity_id)
    }
}

/// Builds a [`Report`] from test-partition predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAggregator;

impl ReportAggregator {
    /// Score `test` overall and once per id in `entity_ids`.
    ///
    /// `entity_ids` fixes the encounter order used to break MAE ties. An id
    /// without test rows gets an all-undefined placeholder; this is logged
    /// and is not an error.
    pub fn build(test: &[PredictionRecord], entity_ids: &[String]) -> Result<Report> {
        let overall = if test.is_empty() {
            warn!("test partition is empty, overall metrics are undefined");
            MetricsBundle::undefined(UndefinedReason::NoObservations)
        } else {
            let (actual, predicted): (Vec<f64>, Vec<f64>) =
                test.iter().map(|r| (r.actual(), r.predicted())).unzip();
            score(&actual, &predicted)?
        };

        let mut by_entity: HashMap<&str, (Vec<f64>, Vec<f64>)> = HashMap::new();
        for record in test {
            let (actual, predicted) = by_entity.entry(record.entity_id()).or_default();
            actual.push(record.actual());
            predicted.push(record.predicted());
        }

        let empty = (Vec::new(), Vec::new());
        let mut entities = entity_ids
            .par_iter()
            .map(|id| {
                let (actual, predicted) = by_entity.get(id.as_str()).unwrap_or(&empty);
                score_entity(id, actual, predicted)
            })
            .collect::<Result<Vec<_>>>()?;
        entities.sort_by(|a, b| compare_mae(&a.metrics, &b.metrics));

        Ok(Report {
            overall,
            observations: test.len(),
            entities,
        })
    }
}

fn score_entity(entity_id: &str, actual: &[f64], predicted: &[f64]) -> Result<EntityMetrics> {
    let metrics = if actual.is_empty() {
        warn!(entity_id = %entity_id, "insufficient data: no test observations");
        MetricsBundle::undefined(UndefinedReason::NoObservations)
    } else {
        debug!(entity_id = %entity_id, rows = actual.len(), "scoring entity");
        score(actual, predicted)?
    };

    Ok(EntityMetrics {
        entity_id: entity_id.to_string(),
        observations: actual.len(),
        metrics,
    })
}

/// Defined MAE ascending, then undefined MAE; ties compare equal so a stable
/// sort keeps encounter order.
fn compare_mae(a: &MetricsBundle, b: &MetricsBundle) -> Ordering {
    match (a.mae.value(), b.mae.value()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall metrics ({} test observations):", self.observations)?;
        for (name, value) in self.overall.named() {
            writeln!(f, "{name}: {value:.4}")?;
        }

        writeln!(f)?;
        writeln!(f, "Per-entity metrics (ranked by MAE):")?;
        if self.entities.is_empty() {
            return writeln!(f, "(no entities)");
        }

        let id_width = self
            .entities
            .iter()
            .map(|e| e.entity_id.chars().count())
            .max()
            .unwrap_or(0)
            .max("Entity".len());

        write!(f, "{:<id_width$} {:>6}", "Entity", "N")?;
        for (name, _) in self.overall.named() {
            write!(f, " {name:>12}")?;
        }
        writeln!(f)?;

        for entity in &self.entities {
            write!(f, "{:<id_width$} {:>6}", entity.entity_id, entity.observations)?;
            for (_, value) in entity.metrics.named() {
                write!(f, " {value:>12.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::metrics::MetricValue;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn record(entity: &str, n: i64, actual: f64, predicted: f64) -> PredictionRecord {
        PredictionRecord::new(entity, day(n), actual, predicted)
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn overall_and_per_entity_scores() {
        let test = vec![
            record("a", 0, 10.0, 9.0),
            record("b", 0, 20.0, 24.0),
            record("a", 1, 12.0, 11.0),
            record("b", 1, 22.0, 18.0),
        ];
        let report = ReportAggregator::build(&test, &ids(&["b", "a"])).unwrap();

        assert_eq!(report.observations(), 4);
        assert_relative_eq!(report.overall().mae.as_f64(), 2.5, epsilon = 1e-12);

        let ranked: Vec<&str> = report.entities().iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ranked, vec!["a", "b"]);
        assert_relative_eq!(report.entity("a").unwrap().metrics.mae.as_f64(), 1.0);
        assert_relative_eq!(report.entity("b").unwrap().metrics.mae.as_f64(), 4.0);
        assert_eq!(report.entity("a").unwrap().observations, 2);
    }

    #[test]
    fn interleaved_rows_are_scored_per_entity() {
        let names: Vec<String> = (0..6).map(|e| format!("e{e}")).collect();
        let mut test = Vec::new();
        for n in 0..10 {
            for (e, name) in names.iter().enumerate() {
                let actual = 10.0 * (e + 1) as f64 + n as f64;
                test.push(record(name, n, actual, actual - (e + 1) as f64 * (n % 3) as f64));
            }
        }
        let report = ReportAggregator::build(&test, &names).unwrap();

        for name in &names {
            let rows: Vec<&PredictionRecord> =
                test.iter().filter(|r| r.entity_id() == name.as_str()).collect();
            let actual: Vec<f64> = rows.iter().map(|r| r.actual()).collect();
            let predicted: Vec<f64> = rows.iter().map(|r| r.predicted()).collect();

            let entity = report.entity(name).unwrap();
            assert_eq!(entity.observations, 10);
            assert_eq!(entity.metrics, score(&actual, &predicted).unwrap());
        }
    }

    #[test]
    fn missing_entity_gets_placeholder_ranked_last() {
        let test = vec![record("a", 0, 10.0, 9.0), record("a", 1, 11.0, 10.0)];
        let report = ReportAggregator::build(&test, &ids(&["ghost", "a"])).unwrap();

        let last = report.entities().last().unwrap();
        assert_eq!(last.entity_id, "ghost");
        assert_eq!(last.observations, 0);
        assert_eq!(
            last.metrics,
            MetricsBundle::undefined(UndefinedReason::NoObservations)
        );
    }

    #[test]
    fn single_row_entity_is_still_scored() {
        let test = vec![record("solo", 0, 5.0, 3.0)];
        let report = ReportAggregator::build(&test, &ids(&["solo"])).unwrap();

        let solo = &report.entities()[0];
        assert_eq!(solo.metrics.mae, MetricValue::Defined(2.0));
        assert!(!solo.metrics.r_squared.is_defined());
        assert!(!solo.metrics.spearman.is_defined());
    }

    #[test]
    fn undefined_mae_keeps_encounter_order() {
        let test = vec![record("x", 0, 1.0, 1.5), record("y", 0, 1.0, 1.2)];
        let report =
            ReportAggregator::build(&test, &ids(&["p", "x", "q", "y", "r"])).unwrap();

        let ranked: Vec<&str> = report.entities().iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ranked, vec!["y", "x", "p", "q", "r"]);
    }

    #[test]
    fn equal_mae_keeps_encounter_order() {
        let test = vec![record("m", 0, 2.0, 1.0), record("n", 0, 3.0, 2.0)];
        let report = ReportAggregator::build(&test, &ids(&["n", "m"])).unwrap();

        let ranked: Vec<&str> = report.entities().iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ranked, vec!["n", "m"]);
    }

    #[test]
    fn empty_test_partition_is_not_fatal() {
        let report = ReportAggregator::build(&[], &ids(&["a"])).unwrap();
        assert_eq!(report.observations(), 0);
        assert!(!report.overall().mae.is_defined());
        assert_eq!(report.entities()[0].observations, 0);
    }

    #[test]
    fn rendering_marks_undefined_values() {
        let test = vec![record("solo", 0, 5.0, 3.0)];
        let report = ReportAggregator::build(&test, &ids(&["solo", "none"])).unwrap();
        let text = report.to_string();

        assert!(text.starts_with("Overall metrics (1 test observations):\n"));
        assert!(text.contains("MAE: 2.0000\n"));
        assert!(text.contains("MAPE: 40.0000\n"));
        assert!(text.contains("R²: undefined\n"));
        assert!(text.contains("Per-entity metrics (ranked by MAE):"));

        let solo_line = text.lines().find(|l| l.starts_with("solo")).unwrap();
        assert!(solo_line.contains("2.0000"));
        let none_line = text.lines().find(|l| l.starts_with("none")).unwrap();
        assert_eq!(none_line.matches("undefined").count(), 7);
        assert!(!none_line.contains("0.0000"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let test = vec![
            record("a", 0, 10.0, 9.0),
            record("b", 0, 20.0, 24.0),
            record("a", 1, 12.0, 11.0),
        ];
        let names = ids(&["a", "b"]);
        let first = ReportAggregator::build(&test, &names).unwrap().to_string();
        let second = ReportAggregator::build(&test, &names).unwrap().to_string();
        assert_eq!(first, second);
    }
}
