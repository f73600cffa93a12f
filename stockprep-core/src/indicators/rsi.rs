//! Relative Strength Index (RSI).
//!
//! Average gains and losses are seeded over the first `period` price
//! changes and then Wilder-smoothed: avg = (prev * (period - 1) + x) / period.
//! RSI = 100 * avg_gain / (avg_gain + avg_loss), 0 when both are zero.
//! Lookback: period.

use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("RSI_{period}"),
        }
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        0.0
    } else {
        100.0 * avg_gain / total
    }
}

pub fn rsi_of_series(close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let ch = close[i] - close[i - 1];
        if ch.is_nan() {
            return result;
        }
        if ch > 0.0 {
            avg_gain += ch;
        } else {
            avg_loss -= ch;
        }
    }
    let p = period as f64;
    avg_gain /= p;
    avg_loss /= p;
    result[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..n {
        let ch = close[i] - close[i - 1];
        if ch.is_nan() {
            return result;
        }
        let (gain, loss) = if ch > 0.0 { (ch, 0.0) } else { (0.0, -ch) };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        result[i] = rsi_value(avg_gain, avg_loss);
    }

    result
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(self.period)
    }

    fn compute(&self, frame: &FeatureFrame, _memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        Ok(rsi_of_series(frame.column(CLOSE)?, self.period))
    }
}
