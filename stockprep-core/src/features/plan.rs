//! FeaturePlan: the ordered, serializable list of indicators to compute.

use crate::indicator::Indicator;
use crate::indicators as ind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("{indicator}: window must be >= 1")]
    ZeroWindow { indicator: String },

    #[error("column {0} is produced more than once")]
    DuplicateColumn(String),

    #[error("plan has no label column")]
    NoLabel,
}

/// One indicator step, as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorSpec {
    MovingAverage { small_win: usize, big_win: usize },
    ExponentialMovingAverage { small_win: usize, big_win: usize },
    Momentum { n: usize },
    RateOfChange { n: usize },
    AverageTrueRange { n: usize },
    RelativeStrengthIndex { n: usize },
    WilliamsR { n: usize },
    BollingerUpper { n: usize },
    BollingerMiddle { n: usize },
    BollingerLower { n: usize },
    MacdLine,
    MacdSignal,
    MacdHist,
    StochasticK,
    StochasticD,
    AccumulationDistribution,
    FutureMovingAverage { n: usize },
    FutureExponentialMovingAverage { n: usize },
}

impl IndicatorSpec {
    /// Window parameters, for validation.
    fn windows(&self) -> Vec<usize> {
        use IndicatorSpec::*;
        match *self {
            MovingAverage { small_win, big_win } | ExponentialMovingAverage { small_win, big_win } => {
                vec![small_win, big_win]
            }
            Momentum { n }
            | RateOfChange { n }
            | AverageTrueRange { n }
            | RelativeStrengthIndex { n }
            | WilliamsR { n }
            | BollingerUpper { n }
            | BollingerMiddle { n }
            | BollingerLower { n }
            | FutureMovingAverage { n }
            | FutureExponentialMovingAverage { n } => vec![n],
            MacdLine | MacdSignal | MacdHist | StochasticK | StochasticD | AccumulationDistribution => {
                Vec::new()
            }
        }
    }

    /// Construct the indicator. Windows must already be validated.
    pub fn build(&self) -> Box<dyn Indicator> {
        use IndicatorSpec::*;
        match *self {
            MovingAverage { small_win, big_win } => Box::new(ind::SmaRatio::new(small_win, big_win)),
            ExponentialMovingAverage { small_win, big_win } => Box::new(ind::EmaRatio::new(small_win, big_win)),
            Momentum { n } => Box::new(ind::Momentum::new(n)),
            RateOfChange { n } => Box::new(ind::Roc::new(n)),
            AverageTrueRange { n } => Box::new(ind::Atr::new(n)),
            RelativeStrengthIndex { n } => Box::new(ind::Rsi::new(n)),
            WilliamsR { n } => Box::new(ind::WilliamsR::new(n)),
            BollingerUpper { n } => Box::new(ind::Bollinger::upper(n)),
            BollingerMiddle { n } => Box::new(ind::Bollinger::middle(n)),
            BollingerLower { n } => Box::new(ind::Bollinger::lower(n)),
            MacdLine => Box::new(ind::Macd::line()),
            MacdSignal => Box::new(ind::Macd::signal()),
            MacdHist => Box::new(ind::Macd::hist()),
            StochasticK => Box::new(ind::Stochastic::k()),
            StochasticD => Box::new(ind::Stochastic::d()),
            AccumulationDistribution => Box::new(ind::AccDist::new()),
            FutureMovingAverage { n } => Box::new(ind::FutureLabel::sma(n)),
            FutureExponentialMovingAverage { n } => Box::new(ind::FutureLabel::ema(n)),
        }
    }

    /// Name of the column this step produces, as reported by the built
    /// indicator.
    ///
    /// # Panics
    ///
    /// Panics on a zero window, like [`IndicatorSpec::build`]. Run
    /// [`FeaturePlan::validate`] first.
    pub fn output_name(&self) -> String {
        self.build().name().to_string()
    }

    pub fn is_label(&self) -> bool {
        matches!(
            self,
            IndicatorSpec::FutureMovingAverage { .. } | IndicatorSpec::FutureExponentialMovingAverage { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePlan {
    pub indicators: Vec<IndicatorSpec>,
}

impl Default for FeaturePlan {
    /// The CNN-LSTM feature set: every indicator family plus FSMA_5 as the target.
    fn default() -> Self {
        use IndicatorSpec::*;
        Self {
            indicators: vec![
                MovingAverage { small_win: 5, big_win: 20 },
                ExponentialMovingAverage { small_win: 5, big_win: 20 },
                Momentum { n: 10 },
                RateOfChange { n: 10 },
                AverageTrueRange { n: 14 },
                BollingerUpper { n: 20 },
                BollingerMiddle { n: 20 },
                BollingerLower { n: 20 },
                RelativeStrengthIndex { n: 14 },
                MacdLine,
                MacdSignal,
                MacdHist,
                WilliamsR { n: 14 },
                StochasticK,
                StochasticD,
                AccumulationDistribution,
                FutureMovingAverage { n: 5 },
            ],
        }
    }
}

impl FeaturePlan {
    pub fn new(indicators: Vec<IndicatorSpec>) -> Self {
        Self { indicators }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen = HashSet::new();
        for spec in &self.indicators {
            if spec.windows().contains(&0) {
                return Err(PlanError::ZeroWindow {
                    indicator: format!("{spec:?}"),
                });
            }
            let name = spec.output_name();
            if !seen.insert(name.clone()) {
                return Err(PlanError::DuplicateColumn(name));
            }
        }
        Ok(())
    }

    /// Output column names in plan order.
    pub fn output_names(&self) -> Vec<String> {
        self.indicators.iter().map(IndicatorSpec::output_name).collect()
    }

    /// Output name of the first label step.
    pub fn label_name(&self) -> Result<String, PlanError> {
        self.indicators
            .iter()
            .find(|s| s.is_label())
            .map(IndicatorSpec::output_name)
            .ok_or(PlanError::NoLabel)
    }

    /// BLAKE3 over the ordered output names. Names encode every parameter,
    /// so two plans share a fingerprint iff they produce the same columns in
    /// the same order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for name in self.output_names() {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }
}
