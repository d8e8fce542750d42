//! Accuracy metrics for forecast evaluation.
//!
//! Degenerate inputs never fail: a metric that cannot be computed is carried
//! as [`MetricValue::Undefined`] with the reason, never coerced to zero.

use crate::error::{EvalError, Result};
use crate::utils::stats::{is_constant, mean, population_std_dev, spearman_correlation};
use std::fmt;

/// Why a metric has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UndefinedReason {
    /// The actual values (or ranks) do not vary.
    ZeroVariance,
    /// Every actual value is zero, so no percentage error exists.
    NoNonZeroActuals,
    /// There was nothing to score.
    NoObservations,
    /// The computation overflowed or met non-finite input.
    NonFinite,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ZeroVariance => "zero variance",
            Self::NoNonZeroActuals => "no non-zero actuals",
            Self::NoObservations => "no observations",
            Self::NonFinite => "non-finite",
        };
        f.write_str(text)
    }
}

/// A metric that is either a finite number or explicitly undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl MetricValue {
    /// Wrap a computed value, demoting NaN and infinities to `Undefined(NonFinite)`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined(UndefinedReason::NonFinite)
        }
    }

    fn from_option(value: Option<f64>, reason: UndefinedReason) -> Self {
        value.map_or(Self::Undefined(reason), Self::from_f64)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined(_) => None,
        }
    }

    /// The value, or NaN when undefined.
    pub fn as_f64(&self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub fn undefined_reason(&self) -> Option<UndefinedReason> {
        match self {
            Self::Defined(_) => None,
            Self::Undefined(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // precision applies to the number only; width always right-aligns
        let text = match self {
            Self::Defined(v) => match f.precision() {
                Some(p) => format!("{v:.p$}"),
                None => v.to_string(),
            },
            Self::Undefined(_) => "undefined".to_string(),
        };
        match f.width() {
            Some(w) => write!(f, "{text:>w$}"),
            None => f.write_str(&text),
        }
    }
}

/// The seven regression-quality metrics for one set of predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsBundle {
    /// Mean Absolute Error
    pub mae: MetricValue,
    /// Mean Squared Error
    pub mse: MetricValue,
    /// Root Mean Squared Error
    pub rmse: MetricValue,
    /// Coefficient of determination, undefined for constant actuals
    pub r_squared: MetricValue,
    /// Mean Absolute Percentage Error over non-zero actuals
    pub mape: MetricValue,
    /// Spearman rank correlation, undefined for constant input
    pub spearman: MetricValue,
    /// Population standard deviation of actual - predicted
    pub error_std: MetricValue,
}

impl MetricsBundle {
    /// Placeholder with every field undefined for the given reason.
    pub fn undefined(reason: UndefinedReason) -> Self {
        let v = MetricValue::Undefined(reason);
        Self {
            mae: v,
            mse: v,
            rmse: v,
            r_squared: v,
            mape: v,
            spearman: v,
            error_std: v,
        }
    }

    /// Label and value of each metric in report order.
    pub fn named(&self) -> [(&'static str, MetricValue); 7] {
        [
            ("MAE", self.mae),
            ("MSE", self.mse),
            ("RMSE", self.rmse),
            ("R²", self.r_squared),
            ("MAPE", self.mape),
            ("Spearman", self.spearman),
            ("Error Std", self.error_std),
        ]
    }
}

/// Score predictions against actual values.
///
/// # Errors
/// `LengthMismatch` if the slices differ in length, `EmptyInput` if they are empty.
///
/// # Example
/// ```
/// use panel_baseline::utils::metrics::{score, MetricValue};
///
/// let metrics = score(&[5.0], &[3.0]).unwrap();
/// assert_eq!(metrics.mae, MetricValue::Defined(2.0));
/// assert_eq!(metrics.mape, MetricValue::Defined(40.0));
/// assert!(!metrics.r_squared.is_defined());
/// ```
pub fn score(actual: &[f64], predicted: &[f64]) -> Result<MetricsBundle> {
    if actual.len() != predicted.len() {
        return Err(EvalError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| a - p)
        .collect();

    let mae = mean(&errors.iter().map(|e| e.abs()).collect::<Vec<_>>());
    let mse = mean(&errors.iter().map(|e| e * e).collect::<Vec<_>>());

    Ok(MetricsBundle {
        mae: MetricValue::from_f64(mae),
        mse: MetricValue::from_f64(mse),
        rmse: MetricValue::from_f64(mse.sqrt()),
        r_squared: MetricValue::from_option(
            r_squared(actual, &errors),
            UndefinedReason::ZeroVariance,
        ),
        mape: MetricValue::from_option(mape(actual, &errors), UndefinedReason::NoNonZeroActuals),
        spearman: MetricValue::from_option(
            spearman_correlation(actual, predicted),
            UndefinedReason::ZeroVariance,
        ),
        error_std: MetricValue::from_f64(population_std_dev(&errors)),
    })
}

/// 1 - SS_res / SS_tot, `None` when the actuals are constant or their
/// spread underflows.
fn r_squared(actual: &[f64], errors: &[f64]) -> Option<f64> {
    if is_constant(actual) {
        return None;
    }
    let m = mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - m).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res: f64 = errors.iter().map(|e| e * e).sum();
    Some(1.0 - ss_res / ss_tot)
}

/// Percentage error averaged over indices whose actual is non-zero.
fn mape(actual: &[f64], errors: &[f64]) -> Option<f64> {
    let ratios: Vec<f64> = actual
        .iter()
        .zip(errors)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| (e / a).abs())
        .collect();
    if ratios.is_empty() {
        return None;
    }
    Some(mean(&ratios) * 100.0)
}
