//! Exponential moving averages and the EMA ratio feature.
//!
//! Two weightings live here:
//! - [`ema_of_series`]: recursive EMA seeded with the SMA of the first
//!   `period` values. Used by MACD. Lookback period - 1.
//! - [`ewm_mean`]: bias-adjusted exponentially weighted mean,
//!   `y[t] = Σ β^i x[t-i] / Σ β^i` with `β = 1 - 2/(span+1)`. Used by the
//!   EMA ratio and the forward EMA label.

use super::sma::ratio_of;
use super::window_mean;
use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

/// Recursive EMA: `EMA[t] = EMA[t-1] + alpha * (x[t] - EMA[t-1])`,
/// `alpha = 2 / (period + 1)`. A NaN anywhere taints everything after it.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let seed = window_mean(&values[..period]);
    if seed.is_nan() {
        return result;
    }
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = prev + alpha * (values[i] - prev);
        result[i] = ema;
        prev = ema;
    }

    result
}

/// Bias-adjusted exponentially weighted mean over `span`.
///
/// NaN inputs are skipped but still age the weights of earlier values.
/// Output is NaN until `min_periods` non-NaN observations have been seen.
pub fn ewm_mean(values: &[f64], span: usize, min_periods: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if span == 0 {
        return result;
    }

    let beta = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut mean = f64::NAN;
    let mut den = 0.0;
    let mut observed = 0usize;

    for (i, &x) in values.iter().enumerate() {
        if x.is_nan() {
            den *= beta;
        } else {
            observed += 1;
            den = den * beta + 1.0;
            mean = if observed == 1 { x } else { mean + (x - mean) / den };
        }
        if observed >= min_periods.max(1) {
            result[i] = mean;
        }
    }

    result
}

#[derive(Debug, Clone)]
pub struct EmaRatio {
    small_win: usize,
    big_win: usize,
    name: String,
}

impl EmaRatio {
    pub fn new(small_win: usize, big_win: usize) -> Self {
        assert!(small_win >= 1 && big_win >= 1, "EMA windows must be >= 1");
        Self {
            small_win,
            big_win,
            name: format!("EMA_{small_win}_{big_win}"),
        }
    }
}

impl Indicator for EmaRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(self.small_win.max(self.big_win) - 1)
    }

    fn compute(&self, frame: &FeatureFrame, _memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let close = frame.column(CLOSE)?;
        let short = ewm_mean(close, self.small_win, self.small_win);
        let long = ewm_mean(close, self.big_win, self.big_win);
        Ok(ratio_of(&short, &long))
    }
}
