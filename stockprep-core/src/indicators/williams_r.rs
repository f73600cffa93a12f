//! Williams %R.
//!
//! WR[t] = -100 * (HH - close[t]) / (HH - LL) over the last `period` bars,
//! HH = highest high, LL = lowest low. A flat window gives 0.
//! Lookback: period - 1.

use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE, HIGH, LOW};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
    name: String,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Williams %R period must be >= 1");
        Self {
            period,
            name: format!("WR_{period}"),
        }
    }
}

/// Highest high and lowest low of a window. NaN if any value is NaN.
pub(crate) fn window_extremes(high: &[f64], low: &[f64]) -> (f64, f64) {
    let mut hh = f64::NEG_INFINITY;
    let mut ll = f64::INFINITY;
    for (&h, &l) in high.iter().zip(low) {
        if h.is_nan() || l.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        hh = hh.max(h);
        ll = ll.min(l);
    }
    (hh, ll)
}

impl Indicator for WilliamsR {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(self.period - 1)
    }

    fn compute(&self, frame: &FeatureFrame, _memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let high = frame.column(HIGH)?;
        let low = frame.column(LOW)?;
        let close = frame.column(CLOSE)?;
        let n = close.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return Ok(result);
        }

        for i in (self.period - 1)..n {
            let start = i + 1 - self.period;
            let (hh, ll) = window_extremes(&high[start..=i], &low[start..=i]);
            let range = hh - ll;
            result[i] = if range == 0.0 {
                0.0
            } else {
                -100.0 * (hh - close[i]) / range
            };
        }

        Ok(result)
    }
}
