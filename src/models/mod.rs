//! Forecasting models.

mod traits;

pub mod baseline;

pub use baseline::RollingBaseline;
pub use traits::OneStepForecaster;
