//! Simple Moving Average (SMA) and the SMA ratio feature.
//!
//! SMA[t] = mean(close[t-period+1..=t]); lookback period - 1.
//! SMA_{s}_{b}[t] = (SMA_b[t] - SMA_s[t]) / SMA_s[t].

use super::window_mean;
use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

/// Rolling mean of a series. Any NaN in a window makes that value NaN.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        result[i] = window_mean(&values[i + 1 - period..=i]);
    }

    result
}

/// `(long - short) / short`, element-wise. NaN wherever either side is NaN.
pub(crate) fn ratio_of(short: &[f64], long: &[f64]) -> Vec<f64> {
    short
        .iter()
        .zip(long)
        .map(|(&s, &l)| (l - s) / s)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SmaRatio {
    small_win: usize,
    big_win: usize,
    name: String,
}

impl SmaRatio {
    pub fn new(small_win: usize, big_win: usize) -> Self {
        assert!(small_win >= 1 && big_win >= 1, "SMA windows must be >= 1");
        Self {
            small_win,
            big_win,
            name: format!("SMA_{small_win}_{big_win}"),
        }
    }
}

impl Indicator for SmaRatio {
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
        let short = sma_of_series(close, self.small_win);
        let long = sma_of_series(close, self.big_win);
        Ok(ratio_of(&short, &long))
    }
}
