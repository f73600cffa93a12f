//! Momentum: simple lookback difference (not percentage).
//!
//! MOM[t] = close[t] - close[t-period]
//! Lookback: period.

use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    name: String,
}

impl Momentum {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Momentum period must be >= 1");
        Self {
            period,
            name: format!("MOM_{period}"),
        }
    }
}

impl Indicator for Momentum {
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
        let close = frame.column(CLOSE)?;
        let mut result = vec![f64::NAN; close.len()];

        for i in self.period..close.len() {
            // NaN on either side propagates through the subtraction
            result[i] = close[i] - close[i - self.period];
        }

        Ok(result)
    }
}
