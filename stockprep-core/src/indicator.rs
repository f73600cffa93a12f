//! Indicator trait and the errors indicator application can raise.
//!
//! Indicators are pure functions: frame columns in, one numeric column out.
//! Multi-output families (Bollinger, MACD, stochastic) are exposed as
//! separate single-column indicators that share their underlying computation
//! through an [`IndicatorMemo`].

use crate::frame::{ColumnRole, FeatureFrame, FrameError, Warmup};
use crate::indicators::memo::IndicatorMemo;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator} requires column {column}, which is not in the frame")]
    MissingColumn { indicator: String, column: String },

    #[error("{indicator}: window must be >= 1, got {window}")]
    InvalidWindow { indicator: String, window: usize },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Trait for indicators.
///
/// `compute` must return one value per frame row. The first `warmup().head`
/// and last `warmup().tail` values are `f64::NAN` on clean input.
///
/// # Look-ahead contamination guard
/// Unless `role()` is [`ColumnRole::Label`], no value at row t may depend on
/// data from row t+1 or later.
pub trait Indicator: Send + Sync {
    /// Output column name (e.g. "SMA_5_20", "ATR_14").
    fn name(&self) -> &str;

    fn role(&self) -> ColumnRole {
        ColumnRole::Feature
    }

    /// Frame columns that must exist before `compute` is called.
    fn inputs(&self) -> &'static [&'static str];

    fn warmup(&self) -> Warmup;

    fn compute(&self, frame: &FeatureFrame, memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError>;
}

/// Fail fast when any input column is absent.
pub fn check_inputs(frame: &FeatureFrame, indicator: &dyn Indicator) -> Result<(), IndicatorError> {
    for column in indicator.inputs() {
        if !frame.contains(column) {
            return Err(IndicatorError::MissingColumn {
                indicator: indicator.name().to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Reject zero-length windows before an indicator is constructed.
pub fn check_window(indicator: &str, window: usize) -> Result<usize, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow {
            indicator: indicator.to_string(),
            window,
        });
    }
    Ok(window)
}

/// Add `indicator`'s column to `frame` unless a column of that name exists.
pub fn apply(
    frame: FeatureFrame,
    indicator: &dyn Indicator,
    memo: &mut IndicatorMemo,
) -> Result<FeatureFrame, IndicatorError> {
    check_inputs(&frame, indicator)?;
    frame.with_column_if_absent(indicator.name(), indicator.role(), indicator.warmup(), |f| {
        indicator.compute(f, memo).map_err(IndicatorError::from)
    })
}
