//! IndicatorLibrary: the named operations the feature pipeline calls.
//!
//! Every operation takes a frame by value and returns it with one more
//! column, or unchanged if that column is already present. Window arguments
//! of 0 are rejected before anything is computed. The library owns the
//! [`IndicatorMemo`] shared by multi-output families, so the three Bollinger
//! bands (or MACD outputs, or stochastic lines) cost one computation.

use crate::frame::FeatureFrame;
use crate::indicator::{self, check_window, Indicator, IndicatorError};
use crate::indicators::{
    AccDist, Atr, Bollinger, EmaRatio, FutureLabel, IndicatorMemo, Macd, Momentum, Roc, Rsi,
    SmaRatio, Stochastic, WilliamsR,
};

#[derive(Debug, Default)]
pub struct IndicatorLibrary {
    memo: IndicatorMemo,
}

impl IndicatorLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memo(&self) -> &IndicatorMemo {
        &self.memo
    }

    /// Apply any indicator, including ones defined outside this crate.
    pub fn apply(&mut self, frame: FeatureFrame, indicator: &dyn Indicator) -> Result<FeatureFrame, IndicatorError> {
        indicator::apply(frame, indicator, &mut self.memo)
    }

    // ─── Trend ───────────────────────────────────────────────────────

    pub fn moving_average(
        &mut self,
        frame: FeatureFrame,
        small_win: usize,
        big_win: usize,
    ) -> Result<FeatureFrame, IndicatorError> {
        check_window("SMA", small_win)?;
        check_window("SMA", big_win)?;
        self.apply(frame, &SmaRatio::new(small_win, big_win))
    }

    pub fn exponential_moving_average(
        &mut self,
        frame: FeatureFrame,
        small_win: usize,
        big_win: usize,
    ) -> Result<FeatureFrame, IndicatorError> {
        check_window("EMA", small_win)?;
        check_window("EMA", big_win)?;
        self.apply(frame, &EmaRatio::new(small_win, big_win))
    }

    pub fn macd_line(&mut self, frame: FeatureFrame) -> Result<FeatureFrame, IndicatorError> {
        self.apply(frame, &Macd::line())
    }

    pub fn macd_signal(&mut self, frame: FeatureFrame) -> Result<FeatureFrame, IndicatorError> {
        self.apply(frame, &Macd::signal())
    }

    pub fn macd_hist(&mut self, frame: FeatureFrame) -> Result<FeatureFrame, IndicatorError> {
        self.apply(frame, &Macd::hist())
    }

    // ─── Momentum ────────────────────────────────────────────────────

    pub fn momentum(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("MOM", n)?;
        self.apply(frame, &Momentum::new(n))
    }

    pub fn rate_of_change(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("ROC", n)?;
        self.apply(frame, &Roc::new(n))
    }

    pub fn relative_strength_index(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("RSI", n)?;
        self.apply(frame, &Rsi::new(n))
    }

    pub fn williams_r(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("WR", n)?;
        self.apply(frame, &WilliamsR::new(n))
    }

    pub fn stochastic_k(&mut self, frame: FeatureFrame) -> Result<FeatureFrame, IndicatorError> {
        self.apply(frame, &Stochastic::k())
    }

    pub fn stochastic_d(&mut self, frame: FeatureFrame) -> Result<FeatureFrame, IndicatorError> {
        self.apply(frame, &Stochastic::d())
    }

    // ─── Volatility / volume ─────────────────────────────────────────

    pub fn average_true_range(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("ATR", n)?;
        self.apply(frame, &Atr::new(n))
    }

    pub fn bollinger_bands_ub(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("BB", n)?;
        self.apply(frame, &Bollinger::upper(n))
    }

    pub fn bollinger_bands_mb(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("BB", n)?;
        self.apply(frame, &Bollinger::middle(n))
    }

    pub fn bollinger_bands_lb(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("BB", n)?;
        self.apply(frame, &Bollinger::lower(n))
    }

    pub fn acc_dist(&mut self, frame: FeatureFrame) -> Result<FeatureFrame, IndicatorError> {
        self.apply(frame, &AccDist::new())
    }

    // ─── Labels ──────────────────────────────────────────────────────

    pub fn future_moving_average(&mut self, frame: FeatureFrame, n: usize) -> Result<FeatureFrame, IndicatorError> {
        check_window("FSMA", n)?;
        self.apply(frame, &FutureLabel::sma(n))
    }

    pub fn future_exponential_moving_average(
        &mut self,
        frame: FeatureFrame,
        n: usize,
    ) -> Result<FeatureFrame, IndicatorError> {
        check_window("FEMA", n)?;
        self.apply(frame, &FutureLabel::ema(n))
    }
}
