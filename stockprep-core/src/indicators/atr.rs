//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), undefined
//! on the first bar. ATR seeds with the mean of TR[1..=period] at row
//! `period` and then applies Wilder smoothing:
//! ATR[t] = (ATR[t-1] * (period - 1) + TR[t]) / period.
//! Lookback: period.

use super::window_mean;
use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE, HIGH, LOW};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("ATR_{period}"),
        }
    }
}

/// True Range series. TR[0] is NaN (no previous close).
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = close.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let (h, l, pc) = (high[i], low[i], close[i - 1]);
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// Wilder-smoothed average of `values[first..]`, seeded with the plain mean
/// of the first `period` values at index `first + period - 1`.
///
/// A NaN after the seed taints every later value.
pub(crate) fn wilder_average(values: &[f64], first: usize, period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    let seed_at = first + period - 1;
    if period == 0 || seed_at >= n {
        return result;
    }

    let seed = window_mean(&values[first..=seed_at]);
    if seed.is_nan() {
        return result;
    }
    result[seed_at] = seed;

    let p = period as f64;
    let mut prev = seed;
    for i in (seed_at + 1)..n {
        if values[i].is_nan() {
            return result;
        }
        prev = (prev * (p - 1.0) + values[i]) / p;
        result[i] = prev;
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(self.period)
    }

    fn compute(&self, frame: &FeatureFrame, _memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let tr = true_range(frame.column(HIGH)?, frame.column(LOW)?, frame.column(CLOSE)?);
        Ok(wilder_average(&tr, 1, self.period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_frame, DEFAULT_EPSILON};

    #[test]
    fn true_range_uses_previous_close() {
        // bar 1: h=12, l=10, prev close=8 → max(2, 4, 2) = 4
        let tr = true_range(&[10.0, 12.0], &[9.0, 10.0], &[8.0, 11.0]);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_seed_and_wilder_step() {
        // Each bar: high = c+1, low = c-1, flat close → TR = 2 everywhere.
        // Then one bar with range 6 → ATR = (2*2 + 6)/3
        let mut rows: Vec<(f64, f64, f64, f64, f64)> = (0..4).map(|_| (10.0, 11.0, 9.0, 10.0, 100.0)).collect();
        rows.push((10.0, 13.0, 7.0, 10.0, 100.0));
        let frame = make_ohlcv_frame(&rows);
        let result = Atr::new(3).compute(&frame, &mut IndicatorMemo::new()).unwrap();

        for v in result.iter().take(3) {
            assert!(v.is_nan());
        }
        assert_approx(result[3], 2.0, DEFAULT_EPSILON);
        assert_approx(result[4], (2.0 * 2.0 + 6.0) / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_nan_after_seed_propagates() {
        let values = [f64::NAN, 1.0, 1.0, 1.0, f64::NAN, 1.0];
        let result = wilder_average(&values, 1, 2);
        assert_approx(result[2], 1.0, DEFAULT_EPSILON);
        assert_approx(result[3], 1.0, DEFAULT_EPSILON);
        assert!(result[4].is_nan());
        assert!(result[5].is_nan());
    }

    #[test]
    fn atr_too_short() {
        let frame = make_ohlcv_frame(&[(1.0, 2.0, 0.5, 1.5, 1.0); 3]);
        let result = Atr::new(5).compute(&frame, &mut IndicatorMemo::new()).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn atr_name_and_warmup() {
        assert_eq!(Atr::new(14).name(), "ATR_14");
        assert_eq!(Atr::new(14).warmup(), Warmup::head(14));
    }
}
