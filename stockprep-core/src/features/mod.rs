//! Feature plans and the builder that turns OHLCV series into feature frames.

pub mod builder;
pub mod plan;

pub use builder::{BuildError, FeatureFrameBuilder};
pub use plan::{FeaturePlan, IndicatorSpec, PlanError};
