//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances, one shared computation):
//! - Middle: SMA(close, period)
//! - Upper: middle + nbdev * stddev(close, period)
//! - Lower: middle - nbdev * stddev(close, period)
//!
//! Uses population stddev (divide by N) and nbdev = 2.
//! Lookback: period - 1.

use super::window_mean;
use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

pub const DEFAULT_NBDEV: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_of_series(close: &[f64], period: usize, nbdev: f64) -> BollingerBands {
    let n = close.len();
    let mut bands = BollingerBands {
        upper: vec![f64::NAN; n],
        middle: vec![f64::NAN; n],
        lower: vec![f64::NAN; n],
    };

    if period == 0 || n < period {
        return bands;
    }

    for i in (period - 1)..n {
        let window = &close[i + 1 - period..=i];
        let mean = window_mean(window);
        if mean.is_nan() {
            continue;
        }
        let variance = window_mean(&window.iter().map(|x| (x - mean) * (x - mean)).collect::<Vec<_>>());
        let stddev = variance.sqrt();

        bands.middle[i] = mean;
        bands.upper[i] = mean + nbdev * stddev;
        bands.lower[i] = mean - nbdev * stddev;
    }

    bands
}

/// Which band of the Bollinger Bands to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let tag = match band {
            BollingerBand::Upper => "UB",
            BollingerBand::Middle => "MB",
            BollingerBand::Lower => "LB",
        };
        Self {
            period,
            band,
            name: format!("BB_{tag}_{period}"),
        }
    }

    pub fn upper(period: usize) -> Self {
        Self::with_band(period, BollingerBand::Upper)
    }

    pub fn middle(period: usize) -> Self {
        Self::with_band(period, BollingerBand::Middle)
    }

    pub fn lower(period: usize) -> Self {
        Self::with_band(period, BollingerBand::Lower)
    }

    pub fn band(&self) -> BollingerBand {
        self.band
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(self.period - 1)
    }

    fn compute(&self, frame: &FeatureFrame, memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let bands = memo.bollinger(frame.column(CLOSE)?, self.period, DEFAULT_NBDEV);
        Ok(match self.band {
            BollingerBand::Upper => bands.upper.clone(),
            BollingerBand::Middle => bands.middle.clone(),
            BollingerBand::Lower => bands.lower.clone(),
        })
    }
}
