//! # panel-baseline
//!
//! Moving-average forecasting baseline for panels of price series.
//!
//! Groups a table of observations by entity, forecasts each entity one step
//! ahead from its own lagged rolling mean, splits all predictions at a single
//! global point in time, and scores the test side overall and per entity.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use panel_baseline::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let rows = (0..40)
//!     .flat_map(|i| {
//!         let ts = start + Duration::days(i);
//!         [
//!             Observation::new("bitcoin", ts, 40_000.0 + 50.0 * i as f64),
//!             Observation::new("ethereum", ts, 2_000.0 + 10.0 * (i % 7) as f64),
//!         ]
//!     })
//!     .collect();
//! let table = PanelTable::from_observations(rows);
//!
//! let evaluator = BaselineEvaluator::new(EvaluationConfig::default()).unwrap();
//! let evaluation = evaluator.run(&table).unwrap();
//!
//! assert_eq!(evaluation.report.entities().len(), 2);
//! println!("{}", evaluation.report);
//! ```

pub mod core;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod utils;

pub use error::{DataWarning, EvalError, Result};

pub mod prelude {
    pub use crate::core::{
        ColumnNames, EntitySeries, Observation, PanelTable, PredictionRecord, RawTable,
        Timestamped,
    };
    pub use crate::error::{DataWarning, EvalError, Result};
    pub use crate::evaluation::{
        BaselineEvaluator, EntityMetrics, Evaluation, EvaluationConfig, Report, ReportAggregator,
    };
    pub use crate::models::{OneStepForecaster, RollingBaseline};
    pub use crate::utils::{score, MetricValue, MetricsBundle, TemporalSplitter, UndefinedReason};
}
