//! Serializable pipeline configuration.
//!
//! Every core operation takes plain parameters; this layer only bundles them
//! so a run can be described in one TOML (or JSON) file.

use crate::features::{FeaturePlan, PlanError};
use crate::loader::{LoaderOptions, WindowConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("window.seq_len must be >= 1")]
    InvalidSeqLen,

    #[error("loader.batch_size must be >= 1")]
    InvalidBatchSize,

    #[error("window.label {label:?} is not produced by the feature plan")]
    UnknownLabel { label: String },
}

/// Feature plan, windowing and loader options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub features: FeaturePlan,
    pub window: WindowConfig,
    pub loader: LoaderOptions,
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or TOML for any other extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.features.validate()?;
        if self.window.seq_len == 0 {
            return Err(ConfigError::InvalidSeqLen);
        }
        if self.loader.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if !self.features.output_names().contains(&self.window.label) {
            return Err(ConfigError::UnknownLabel {
                label: self.window.label.clone(),
            });
        }
        Ok(())
    }
}
