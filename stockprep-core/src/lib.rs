//! stockprep core: feature engineering and batching for OHLCV forecasting.
//!
//! This crate turns raw price/volume bars into supervised-learning samples:
//! - Domain types (bars, validated OHLCV series)
//! - `FeatureFrame`, a date-indexed table of role-tagged columns
//! - Indicator library (moving-average ratios, RSI, MACD, Bollinger Bands,
//!   stochastic, ATR, Williams %R, A/D, momentum, ROC) and future labels
//! - Feature plans and the builder that applies them per instrument
//! - Sequential train/validation splitting with a seeded generator
//! - Windowed datasets and a batching loader with `split_validation`
//! - CSV/Parquet ingestion and export, TOML pipeline configuration

pub mod config;
pub mod data;
pub mod domain;
pub mod features;
pub mod frame;
pub mod indicator;
pub mod indicators;
pub mod library;
pub mod loader;
pub mod sampler;
pub mod split;

pub use config::{ConfigError, PipelineConfig};
pub use features::{FeatureFrameBuilder, FeaturePlan, IndicatorSpec};
pub use frame::{ColumnRole, FeatureFrame, Warmup};
pub use library::IndicatorLibrary;
pub use loader::{BatchingDataLoader, LoaderOptions, WindowConfig, WindowDataset};
pub use split::{SequentialSplitter, ValidationSplit};
