//! Slow stochastic oscillator (fastk 5, slowk 3 SMA, slowd 3 SMA).
//!
//! fastK[t] = 100 * (close - LL) / (HH - LL) over `fastk` bars, 0 on a flat
//! window. slowK = SMA(fastK, slowk); slowD = SMA(slowK, slowd).
//! Both lines are undefined until D is: lookback fastk + slowk + slowd - 3.

use super::sma::sma_of_series;
use super::williams_r::window_extremes;
use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE, HIGH, LOW};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

pub const FASTK: usize = 5;
pub const SLOWK: usize = 3;
pub const SLOWD: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticLines {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn stochastic_lookback(fastk: usize, slowk: usize, slowd: usize) -> usize {
    (fastk + slowk + slowd).saturating_sub(3)
}

pub fn stochastic_of_series(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    fastk: usize,
    slowk: usize,
    slowd: usize,
) -> StochasticLines {
    let n = close.len();
    let mut fast = vec![f64::NAN; n];

    if fastk >= 1 && n >= fastk {
        for i in (fastk - 1)..n {
            let start = i + 1 - fastk;
            let (hh, ll) = window_extremes(&high[start..=i], &low[start..=i]);
            let range = hh - ll;
            fast[i] = if range == 0.0 {
                0.0
            } else {
                100.0 * (close[i] - ll) / range
            };
        }
    }

    let mut k = sma_of_series(&fast, slowk);
    let d = sma_of_series(&k, slowd);

    let lookback = stochastic_lookback(fastk, slowk, slowd).min(n);
    for v in &mut k[..lookback] {
        *v = f64::NAN;
    }

    StochasticLines { k, d }
}

/// Which stochastic line to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn k() -> Self {
        Self {
            line: StochasticLine::K,
            name: "STOCHA_K".to_string(),
        }
    }

    pub fn d() -> Self {
        Self {
            line: StochasticLine::D,
            name: "STOCHA_D".to_string(),
        }
    }

    pub fn line(&self) -> StochasticLine {
        self.line
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn warmup(&self) -> Warmup {
        Warmup::head(stochastic_lookback(FASTK, SLOWK, SLOWD))
    }

    fn compute(&self, frame: &FeatureFrame, memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let lines = memo.stochastic(
            frame.column(HIGH)?,
            frame.column(LOW)?,
            frame.column(CLOSE)?,
            FASTK,
            SLOWK,
            SLOWD,
        );
        Ok(match self.line {
            StochasticLine::K => lines.k.clone(),
            StochasticLine::D => lines.d.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_frame, make_ohlcv_frame, DEFAULT_EPSILON};

    #[test]
    fn stochastic_warmup_is_8() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 + (i as f64 * 0.9).cos() * 3.0).collect();
        let frame = make_frame(&closes);
        let mut memo = IndicatorMemo::new();
        let k = Stochastic::k().compute(&frame, &mut memo).unwrap();
        let d = Stochastic::d().compute(&frame, &mut memo).unwrap();
        for i in 0..8 {
            assert!(k[i].is_nan(), "K defined at {i}");
            assert!(d[i].is_nan(), "D defined at {i}");
        }
        assert!(k[8..].iter().all(|v| v.is_finite()));
        assert!(d[8..].iter().all(|v| v.is_finite()));
        assert_eq!(Stochastic::k().warmup(), Warmup::head(8));
    }

    #[test]
    fn k_and_d_share_one_computation() {
        let frame = make_frame(&[1.0; 12]);
        let mut memo = IndicatorMemo::new();
        Stochastic::k().compute(&frame, &mut memo).unwrap();
        Stochastic::d().compute(&frame, &mut memo).unwrap();
        assert_eq!(memo.misses(), 1);
        assert_eq!(memo.hits(), 1);
    }

    #[test]
    fn close_at_high_gives_100() {
        // Each bar closes at its high and lows never move → fastK = 100.
        let rows: Vec<(f64, f64, f64, f64, f64)> =
            (0..12).map(|i| (1.0, 10.0 + i as f64, 1.0, 10.0 + i as f64, 1.0)).collect();
        let frame = make_ohlcv_frame(&rows);
        let mut memo = IndicatorMemo::new();
        let lines = memo.stochastic(
            frame.column(HIGH).unwrap(),
            frame.column(LOW).unwrap(),
            frame.column(CLOSE).unwrap(),
            FASTK,
            SLOWK,
            SLOWD,
        );
        assert_approx(lines.k[8], 100.0, DEFAULT_EPSILON);
        assert_approx(lines.d[11], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_window_gives_zero() {
        let lines = stochastic_of_series(&[3.0; 10], &[3.0; 10], &[3.0; 10], 5, 3, 3);
        assert_eq!(lines.k[9], 0.0);
        assert_eq!(lines.d[9], 0.0);
    }
}
