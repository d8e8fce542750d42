//! Error and warning types for the evaluation pipeline.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that abort an evaluation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A required column is absent from the raw table.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A data row has a different number of cells than the header.
    #[error("row {row}: expected {expected} fields, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A data row has a blank entity identifier.
    #[error("row {row}: empty entity id")]
    EmptyEntityId { row: usize },

    /// A timestamp cell could not be parsed.
    #[error("row {row}: unparseable timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    /// A price cell could not be coerced to a finite number.
    #[error("row {row}: non-numeric price {value:?}")]
    InvalidPrice { row: usize, value: String },

    /// Actual and predicted sequences differ in length.
    #[error("length mismatch: {actual} actual values, {predicted} predicted values")]
    LengthMismatch { actual: usize, predicted: usize },

    /// Scoring was asked for on zero observations.
    #[error("empty input data")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl EvalError {
    /// Whether the error was caused by the input table rather than by the caller.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_)
                | Self::RaggedRow { .. }
                | Self::EmptyEntityId { .. }
                | Self::InvalidTimestamp { .. }
                | Self::InvalidPrice { .. }
        )
    }
}

/// Conditions that degrade a run without aborting it.
#[derive(Debug, Clone, PartialEq)]
pub enum DataWarning {
    /// Several observations of one entity share a timestamp.
    DuplicateTimestamp {
        entity_id: String,
        timestamp: DateTime<Utc>,
        count: usize,
    },
    /// An entity is too short to yield any one-step prediction.
    InsufficientHistory {
        entity_id: String,
        rows: usize,
        required: usize,
    },
    /// An entity has no rows in the test partition.
    EmptyTestPartition { entity_id: String },
    /// The entity filter names an entity absent from the table.
    UnknownEntity { entity_id: String },
}

impl DataWarning {
    pub fn entity_id(&self) -> &str {
        match self {
            Self::DuplicateTimestamp { entity_id, .. }
            | Self::InsufficientHistory { entity_id, .. }
            | Self::EmptyTestPartition { entity_id }
            | Self::UnknownEntity { entity_id } => entity_id,
        }
    }
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTimestamp {
                entity_id,
                timestamp,
                count,
            } => write!(
                f,
                "{entity_id}: {count} observations share timestamp {}",
                timestamp.to_rfc3339()
            ),
            Self::InsufficientHistory {
                entity_id,
                rows,
                required,
            } => write!(
                f,
                "{entity_id}: {rows} rows, at least {required} needed for a prediction"
            ),
            Self::EmptyTestPartition { entity_id } => {
                write!(f, "{entity_id}: no observations in the test partition")
            }
            Self::UnknownEntity { entity_id } => {
                write!(f, "{entity_id}: requested entity not present in the table")
            }
        }
    }
}
