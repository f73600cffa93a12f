//! FeatureFrameBuilder: runs a [`FeaturePlan`] over OHLCV series.

use super::plan::{FeaturePlan, PlanError};
use crate::domain::OhlcvSeries;
use crate::frame::FeatureFrame;
use crate::indicator::{Indicator, IndicatorError};
use crate::library::IndicatorLibrary;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("invalid feature plan: {0}")]
    Plan(#[from] PlanError),

    #[error("{symbol}: {source}")]
    Indicator {
        symbol: String,
        #[source]
        source: IndicatorError,
    },
}

pub struct FeatureFrameBuilder {
    plan: FeaturePlan,
    indicators: Vec<Box<dyn Indicator>>,
}

impl std::fmt::Debug for FeatureFrameBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureFrameBuilder")
            .field("plan", &self.plan)
            .finish()
    }
}

impl FeatureFrameBuilder {
    /// Validate the plan and construct its indicators once.
    pub fn new(plan: FeaturePlan) -> Result<Self, BuildError> {
        plan.validate()?;
        let indicators = plan.indicators.iter().map(|spec| spec.build()).collect();
        Ok(Self { plan, indicators })
    }

    pub fn plan(&self) -> &FeaturePlan {
        &self.plan
    }

    /// Enrich one series. Rows are never dropped or reordered; warm-up rows
    /// stay NaN.
    pub fn build(&self, series: &OhlcvSeries) -> Result<FeatureFrame, BuildError> {
        let mut library = IndicatorLibrary::new();
        let mut frame = FeatureFrame::from_series(series);

        for indicator in &self.indicators {
            frame = library
                .apply(frame, indicator.as_ref())
                .map_err(|source| BuildError::Indicator {
                    symbol: series.symbol().to_string(),
                    source,
                })?;
        }

        tracing::debug!(
            symbol = series.symbol(),
            rows = frame.height(),
            columns = frame.width(),
            memo_hits = library.memo().hits(),
            "built feature frame"
        );
        Ok(frame)
    }

    /// One frame per instrument, in input order.
    pub fn build_all(&self, series: &[OhlcvSeries]) -> Result<Vec<FeatureFrame>, BuildError> {
        series.iter().map(|s| self.build(s)).collect()
    }
}
