//! Core data structures: observations, the panel table and per-entity series.

mod observation;
mod prediction;
mod series;
mod table;

pub use observation::{parse_timestamp, Observation, Timestamped};
pub use prediction::PredictionRecord;
pub use series::EntitySeries;
pub use table::{ColumnNames, PanelTable, RawTable};
