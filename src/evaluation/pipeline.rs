//! End-to-end baseline evaluation: group, forecast, split, score.

use crate::core::{EntitySeries, PanelTable, PredictionRecord, Timestamped};
use crate::error::{DataWarning, EvalError, Result};
use crate::evaluation::report::{Report, ReportAggregator};
use crate::models::{OneStepForecaster, RollingBaseline};
use crate::utils::temporal_split::TemporalSplitter;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Parameters of an evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Moving-average window.
    pub window: usize,
    /// Share of rows, in global time order, placed before the cutoff.
    pub train_fraction: f64,
    /// Entities to evaluate; `None` evaluates every entity in the table.
    pub entity_filter: Option<BTreeSet<String>>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            window: 5,
            train_fraction: 0.75,
            entity_filter: None,
        }
    }
}

impl EvaluationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the moving-average window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the train share of the global split.
    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self
    }

    /// Restrict the run to the given entities.
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_filter = Some(entities.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<()> {
        RollingBaseline::new(self.window)?;
        self.validate_split()
    }

    /// Checks everything except the window, which only the built-in baseline reads.
    fn validate_split(&self) -> Result<()> {
        TemporalSplitter::new(self.train_fraction)?;
        if self.entity_filter.as_ref().is_some_and(BTreeSet::is_empty) {
            return Err(EvalError::InvalidParameter(
                "entity filter must name at least one entity".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub report: Report,
    /// Predictions before the cutoff, chronological.
    pub train: Vec<PredictionRecord>,
    /// Predictions at and after the cutoff, chronological.
    pub test: Vec<PredictionRecord>,
    /// First test timestamp, shared by all entities.
    pub cutoff: Option<DateTime<Utc>>,
    pub warnings: Vec<DataWarning>,
}

impl Evaluation {
    /// Test-partition records of one entity in time order, for plotting.
    pub fn plot_points<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> impl Iterator<Item = &'a PredictionRecord> + 'a {
        self.test.iter().filter(move |r| r.entity_id() == entity_id)
    }
}

/// Runs a one-step forecaster over every entity of a table and scores it.
#[derive(Debug, Clone)]
pub struct BaselineEvaluator<F = RollingBaseline> {
    config: EvaluationConfig,
    splitter: TemporalSplitter,
    forecaster: F,
}

impl BaselineEvaluator<RollingBaseline> {
    /// Evaluate a moving average with the configured window.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        let forecaster = RollingBaseline::new(config.window)?;
        Self::with_forecaster(config, forecaster)
    }
}

impl<F: OneStepForecaster> BaselineEvaluator<F> {
    /// Evaluate an arbitrary forecaster; `config.window` is not consulted.
    pub fn with_forecaster(config: EvaluationConfig, forecaster: F) -> Result<Self> {
        config.validate_split()?;
        let splitter = TemporalSplitter::new(config.train_fraction)?;
        Ok(Self {
            config,
            splitter,
            forecaster,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    pub fn run(&self, table: &PanelTable) -> Result<Evaluation> {
        let mut warnings = Vec::new();

        let table = match &self.config.entity_filter {
            Some(filter) => {
                let present: HashSet<String> = table.entity_ids().into_iter().collect();
                for missing in filter.iter().filter(|id| !present.contains(*id)) {
                    raise(
                        &mut warnings,
                        DataWarning::UnknownEntity {
                            entity_id: missing.clone(),
                        },
                    );
                }
                Cow::Owned(table.retain_entities(filter))
            }
            None => Cow::Borrowed(table),
        };

        let groups = EntitySeries::group(&table);
        for series in &groups {
            for (timestamp, count) in series.duplicate_timestamps() {
                raise(
                    &mut warnings,
                    DataWarning::DuplicateTimestamp {
                        entity_id: series.entity_id().to_string(),
                        timestamp,
                        count,
                    },
                );
            }
        }

        let per_entity = groups
            .par_iter()
            .map(|series| self.forecaster.forecast(series))
            .collect::<Result<Vec<_>>>()?;

        let min_history = self.forecaster.min_history();
        for (series, records) in groups.iter().zip(&per_entity) {
            debug!(
                entity_id = %series.entity_id(),
                rows = series.len(),
                predictions = records.len(),
                "forecast entity"
            );
            if records.is_empty() {
                raise(
                    &mut warnings,
                    DataWarning::InsufficientHistory {
                        entity_id: series.entity_id().to_string(),
                        rows: series.len(),
                        required: min_history,
                    },
                );
            }
        }

        let split = self
            .splitter
            .split(per_entity.into_iter().flatten().collect::<Vec<_>>());
        let cutoff = split.cutoff();

        let entity_ids = report_order(&split.test, &groups);
        let report = ReportAggregator::build(&split.test, &entity_ids)?;
        for entity in report.entities().iter().filter(|e| e.observations == 0) {
            warnings.push(DataWarning::EmptyTestPartition {
                entity_id: entity.entity_id.clone(),
            });
        }

        info!(
            forecaster = self.forecaster.name(),
            entities = groups.len(),
            train = split.train.len(),
            test = split.test.len(),
            cutoff = ?cutoff,
            warnings = warnings.len(),
            "evaluation complete"
        );

        Ok(Evaluation {
            report,
            train: split.train,
            test: split.test,
            cutoff,
            warnings,
        })
    }
}

fn raise(warnings: &mut Vec<DataWarning>, warning: DataWarning) {
    warn!(entity_id = %warning.entity_id(), "{warning}");
    warnings.push(warning);
}

/// Entities by first appearance in the test partition, then the remaining
/// grouped entities in table order.
fn report_order(test: &[PredictionRecord], groups: &[EntitySeries]) -> Vec<String> {
    let mut seen = HashSet::new();
    test.iter()
        .map(|r| r.entity_id())
        .chain(groups.iter().map(EntitySeries::entity_id))
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}
