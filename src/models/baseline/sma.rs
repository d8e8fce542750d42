//! Rolling simple moving average with a one-step lag.
//!
//! The SMA at index `i` is the mean of the prices at `[i - window + 1, i]`.
//! The prediction for index `i` is the SMA at `i - 1`, so an entity's first
//! `window` observations never receive a prediction.

use crate::core::{EntitySeries, PredictionRecord, Timestamped};
use crate::error::{EvalError, Result};
use crate::models::OneStepForecaster;

/// Lagged simple moving average forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingBaseline {
    window: usize,
}

impl RollingBaseline {
    /// Create a baseline over the last `window` observations.
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(EvalError::InvalidParameter(
                "window must be at least 1".to_string(),
            ));
        }
        Ok(Self { window })
    }

    /// Get the window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Rolling means aligned to the input: `None` until the window is full.
    pub fn rolling_mean(&self, values: &[f64]) -> Vec<Option<f64>> {
        let warmup = (self.window - 1).min(values.len());
        let means = values
            .windows(self.window)
            .map(|w| Some(w.iter().sum::<f64>() / self.window as f64));
        std::iter::repeat(None).take(warmup).chain(means).collect()
    }

    /// One-step-ahead predictions for every observation past the first `window`.
    pub fn compute(&self, series: &EntitySeries) -> Vec<PredictionRecord> {
        let means = self.rolling_mean(&series.prices());

        // observation i is forecast by the mean ending at i - 1
        series
            .observations()
            .iter()
            .skip(1)
            .zip(means)
            .filter_map(|(obs, mean)| {
                mean.map(|predicted| {
                    PredictionRecord::new(obs.entity_id(), obs.timestamp(), obs.price(), predicted)
                })
            })
            .collect()
    }
}

impl Default for RollingBaseline {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl OneStepForecaster for RollingBaseline {
    fn forecast(&self, series: &EntitySeries) -> Result<Vec<PredictionRecord>> {
        Ok(self.compute(series))
    }

    fn name(&self) -> &str {
        "SimpleMovingAverage"
    }

    fn min_history(&self) -> usize {
        self.window + 1
    }
}
