//! Concrete indicator implementations.
//!
//! Each module exposes the raw series math on `&[f64]` slices plus one or
//! more [`Indicator`](crate::indicator::Indicator) types that read their
//! inputs from a [`FeatureFrame`](crate::frame::FeatureFrame).
//!
//! Multi-output families (Bollinger, MACD, stochastic) are exposed as
//! separate named instances per output. They share one computation through
//! [`IndicatorMemo`].

pub mod acc_dist;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod future;
pub mod macd;
pub mod memo;
pub mod momentum;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams_r;

pub use acc_dist::AccDist;
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand, BollingerBands};
pub use ema::EmaRatio;
pub use future::{FutureAverage, FutureLabel};
pub use macd::{Macd, MacdLines, MacdOutput};
pub use memo::{IndicatorMemo, MemoKey};
pub use momentum::Momentum;
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::SmaRatio;
pub use stochastic::{Stochastic, StochasticLine, StochasticLines};
pub use williams_r::WilliamsR;

/// Mean of `window`, accumulated incrementally so a constant window yields
/// that constant bit-for-bit. Returns NaN if any value is NaN.
pub(crate) fn window_mean(window: &[f64]) -> f64 {
    let mut mean = 0.0;
    for (k, &v) in window.iter().enumerate() {
        if v.is_nan() {
            return f64::NAN;
        }
        mean += (v - mean) / (k + 1) as f64;
    }
    mean
}

/// Build a frame from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_frame(closes: &[f64]) -> crate::frame::FeatureFrame {
    let rows: Vec<(f64, f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close, 1000.0)
        })
        .collect();
    make_ohlcv_frame(&rows)
}

/// Build a frame from explicit (open, high, low, close, volume) rows.
#[cfg(test)]
pub fn make_ohlcv_frame(rows: &[(f64, f64, f64, f64, f64)]) -> crate::frame::FeatureFrame {
    use crate::domain::{Bar, OhlcvSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close, volume))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        })
        .collect();
    let series = OhlcvSeries::new("TEST", bars).unwrap();
    crate::frame::FeatureFrame::from_series(&series)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_mean_of_constant_is_exact() {
        assert_eq!(window_mean(&[0.1, 0.1, 0.1]), 0.1);
        assert_eq!(window_mean(&[100.37; 20]), 100.37);
    }

    #[test]
    fn window_mean_basic() {
        assert_approx(window_mean(&[10.0, 11.0, 12.0]), 11.0, DEFAULT_EPSILON);
        assert!(window_mean(&[1.0, f64::NAN]).is_nan());
    }
}
