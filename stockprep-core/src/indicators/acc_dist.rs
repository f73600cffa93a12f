//! Chaikin accumulation/distribution line.
//!
//! AD[t] = AD[t-1] + ((close - low) - (high - close)) / (high - low) * volume
//! Bars with high == low add nothing. Defined from the first bar.

use crate::frame::{FeatureFrame, FrameError, Warmup, CLOSE, HIGH, LOW, VOLUME};
use crate::indicator::Indicator;
use crate::indicators::memo::IndicatorMemo;

#[derive(Debug, Clone, Default)]
pub struct AccDist;

impl AccDist {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for AccDist {
    fn name(&self) -> &str {
        "ACC"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE, VOLUME]
    }

    fn warmup(&self) -> Warmup {
        Warmup::NONE
    }

    fn compute(&self, frame: &FeatureFrame, _memo: &mut IndicatorMemo) -> Result<Vec<f64>, FrameError> {
        let high = frame.column(HIGH)?;
        let low = frame.column(LOW)?;
        let close = frame.column(CLOSE)?;
        let volume = frame.column(VOLUME)?;

        let mut ad = 0.0;
        let result = (0..close.len())
            .map(|i| {
                let range = high[i] - low[i];
                if range != 0.0 {
                    ad += ((close[i] - low[i]) - (high[i] - close[i])) / range * volume[i];
                }
                ad
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_frame, DEFAULT_EPSILON};

    #[test]
    fn acc_dist_cumulates() {
        let frame = make_ohlcv_frame(&[
            // close at high: +volume
            (1.0, 10.0, 8.0, 10.0, 100.0),
            // close at low: -volume
            (1.0, 10.0, 8.0, 8.0, 50.0),
            // flat bar: no contribution
            (9.0, 9.0, 9.0, 9.0, 1_000.0),
            // close mid-range: zero
            (1.0, 12.0, 10.0, 11.0, 70.0),
        ]);
        let result = AccDist::new().compute(&frame, &mut IndicatorMemo::new()).unwrap();
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 50.0, DEFAULT_EPSILON);
        assert_approx(result[2], 50.0, DEFAULT_EPSILON);
        assert_approx(result[3], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn acc_dist_defined_from_first_row() {
        let frame = make_ohlcv_frame(&[(1.0, 2.0, 0.0, 1.5, 10.0)]);
        let result = AccDist::new().compute(&frame, &mut IndicatorMemo::new()).unwrap();
        assert!(result[0].is_finite());
        assert_eq!(AccDist::new().warmup(), Warmup::NONE);
    }
}
