//! OneStepForecaster trait defining the interface the evaluator drives.

use crate::core::{EntitySeries, PredictionRecord};
use crate::error::Result;

/// A model producing one-step-ahead predictions over a single entity's history.
///
/// Implementations must only read the series they are handed and must only
/// use observations strictly before the predicted timestamp. The evaluator
/// calls `forecast` for several entities in parallel, hence `Sync`.
pub trait OneStepForecaster: Sync {
    /// Produce one record per observation that has a defined prediction.
    fn forecast(&self, series: &EntitySeries) -> Result<Vec<PredictionRecord>>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Fewest observations an entity needs before any prediction appears.
    fn min_history(&self) -> usize {
        1
    }
}
