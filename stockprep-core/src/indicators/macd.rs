//! MACD (12/26/9).
//!
//! line = EMA(fast) - EMA(slow), signal = EMA(line, signal), hist = line -
//! signal. Every EMA is seeded with the SMA of its first `period` values.
//! All three outputs share the signal line's lookback,
//! slow + signal - 2 (33 for the defaults).

use super::ema::ema_of_series;
use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

pub const FAST: usize = 12;
pub const SLOW: usize = 26;
pub const SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

pub fn macd_lookback(fast: usize, slow: usize, signal: usize) -> usize {
    (fast.max(slow) + signal).saturating_sub(2)
}

pub fn macd_of_series(close: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let n = close.len();
    let mut lines = MacdLines {
        macd: vec![f64::NAN; n],
        signal: vec![f64::NAN; n],
        hist: vec![f64::NAN; n],
    };
    if fast == 0 || slow == 0 || signal == 0 {
        return lines;
    }

    let fast_ema = ema_of_series(close, fast);
    let slow_ema = ema_of_series(close, slow);
    let raw: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();

    // The raw line starts where the slower EMA does.
    let offset = fast.max(slow) - 1;
    if offset >= n {
        return lines;
    }
    let signal_tail = ema_of_series(&raw[offset..], signal);

    let lookback = macd_lookback(fast, slow, signal);
    for i in lookback..n {
        let sig = signal_tail[i - offset];
        lines.macd[i] = raw[i];
        lines.signal[i] = sig;
        lines.hist[i] = raw[i] - sig;
    }

    lines
}

/// Which MACD output to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
    Hist,
}

#[derive(Debug, Clone)]
pub struct Macd {
    output: MacdOutput,
    name: String,
}

impl Macd {
    fn with_output(output: MacdOutput, name: &str) -> Self {
        Self {
            output,
            name: name.to_string(),
        }
    }

    pub fn line() -> Self {
        Self::with_output(MacdOutput::Line, "MACD_MACD")
    }

    pub fn signal() -> Self {
        Self::with_output(MacdOutput::Signal, "MACD_SIGNAL")
    }

    pub fn hist() -> Self {
        Self::with_output(MacdOutput::Hist, "MACD_HIST")
    }

    pub fn output(&self) -> MacdOutput {
        self.output
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(macd_lookback(FAST, SLOW, SIGNAL))
    }

    fn compute(&self, frame: &FeatureFrame, memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let lines = memo.macd(frame.column(CLOSE)?, FAST, SLOW, SIGNAL);
        Ok(match self.output {
            MacdOutput::Line => lines.macd.clone(),
            MacdOutput::Signal => lines.signal.clone(),
            MacdOutput::Hist => lines.hist.clone(),
        })
    }
}
