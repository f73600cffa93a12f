//! Forward-looking moving-average labels (prediction targets).
//!
//! The close series is reversed, averaged with the ordinary SMA or EWM
//! machinery and reversed back, giving `fwd[t]` = average of close[t..t+n].
//! The label is the relative move from today's close to tomorrow's forward
//! average:
//!
//! FSMA_n[t] / FEMA_n[t] = (fwd[t+1] - close[t]) / close[t]
//!
//! The last `n` rows are undefined. These columns read future rows by
//! construction and carry [`ColumnRole::Label`].

use super::ema::ewm_mean;
use super::sma::sma_of_series;
use crate::frame::{ColumnRole, FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FutureAverage {
    Sma,
    Ema,
}

/// Average of `close[t..t+window]` (SMA) or the EWM over the same forward
/// span, indexed at `t`.
pub fn forward_average(close: &[f64], window: usize, average: FutureAverage) -> Vec<f64> {
    let reversed: Vec<f64> = close.iter().rev().copied().collect();
    let mut averaged = match average {
        FutureAverage::Sma => sma_of_series(&reversed, window),
        FutureAverage::Ema => ewm_mean(&reversed, window, window),
    };
    averaged.reverse();
    averaged
}

#[derive(Debug, Clone)]
pub struct FutureLabel {
    window: usize,
    average: FutureAverage,
    name: String,
}

impl FutureLabel {
    pub fn new(window: usize, average: FutureAverage) -> Self {
        assert!(window >= 1, "future label window must be >= 1");
        let prefix = match average {
            FutureAverage::Sma => "FSMA",
            FutureAverage::Ema => "FEMA",
        };
        Self {
            window,
            average,
            name: format!("{prefix}_{window}"),
        }
    }

    pub fn sma(window: usize) -> Self {
        Self::new(window, FutureAverage::Sma)
    }

    pub fn ema(window: usize) -> Self {
        Self::new(window, FutureAverage::Ema)
    }

    pub fn average(&self) -> FutureAverage {
        self.average
    }
}

impl Indicator for FutureLabel {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ColumnRole {
        ColumnRole::Label
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::tail(self.window)
    }

    fn compute(&self, frame: &FeatureFrame, _memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let close = frame.column(CLOSE)?;
        let fwd = forward_average(close, self.window, self.average);
        let n = close.len();

        let mut result = vec![f64::NAN; n];
        for t in 0..n.saturating_sub(1) {
            result[t] = (fwd[t + 1] - close[t]) / close[t];
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_frame, DEFAULT_EPSILON};

    fn label(closes: &[f64], ind: FutureLabel) -> Vec<f64> {
        ind.compute(&make_frame(closes), &mut IndicatorMemo::new()).unwrap()
    }

    #[test]
    fn forward_sma_covers_today_and_ahead() {
        let fwd = forward_average(&[1.0, 2.0, 3.0, 4.0], 2, FutureAverage::Sma);
        assert_approx(fwd[0], 1.5, DEFAULT_EPSILON);
        assert_approx(fwd[2], 3.5, DEFAULT_EPSILON);
        assert!(fwd[3].is_nan());
    }

    #[test]
    fn fsma_known_values() {
        // fwd[1] = mean(2,3) = 2.5 → (2.5 - 1)/1
        // fwd[4] = mean(5,6) = 5.5 → (5.5 - 4)/4
        let result = label(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], FutureLabel::sma(2));
        assert_approx(result[0], 1.5, DEFAULT_EPSILON);
        assert_approx(result[3], 0.375, DEFAULT_EPSILON);
        assert!(result[4].is_nan());
        assert!(result[5].is_nan());
    }

    #[test]
    fn fema_undefined_region_is_the_tail() {
        let closes: Vec<f64> = (1..=30).map(|i| 50.0 + i as f64).collect();
        let result = label(&closes, FutureLabel::ema(5));
        assert!(result[..25].iter().all(|v| v.is_finite()));
        assert!(result[25..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn fema_constant_series_is_zero() {
        let result = label(&[42.42; 12], FutureLabel::ema(3));
        for &v in &result[..9] {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn labels_carry_label_role() {
        let ind = FutureLabel::sma(5);
        assert_eq!(ind.name(), "FSMA_5");
        assert_eq!(ind.role(), ColumnRole::Label);
        assert_eq!(ind.warmup(), Warmup::tail(5));
        assert_eq!(FutureLabel::ema(10).name(), "FEMA_10");
    }
}
