//! Datasets: positional sample access, plus the windowed dataset built from
//! a feature frame.

use crate::frame::{ColumnRole, FeatureFrame, FrameError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Random access to samples by position.
///
/// `get` is only called with indices below `len()`; implementations may
/// panic otherwise, the way slice indexing does.
pub trait Dataset: Send + Sync {
    type Item: Send;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Self::Item;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Dataset for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> T {
        self[index].clone()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("column {0} is a label and cannot be used as a feature")]
    LabelAsFeature(String),

    #[error("column {column} has a non-finite value at row {row} outside its warm-up")]
    NonFinite { column: String, row: usize },

    #[error("sequence length must be >= 1")]
    InvalidSeqLen,

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Which columns to window and how long each window is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub seq_len: usize,
    pub label: String,
    /// Feature columns in order. `None` means every non-label column.
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            seq_len: 20,
            label: "FSMA_5".to_string(),
            features: None,
        }
    }
}

/// One (feature-sequence, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSample {
    /// Row-major `[seq_len, n_features]`.
    pub features: Vec<f32>,
    pub label: f32,
    /// Frame row of the window's last bar (where the label is read).
    pub row: usize,
    pub shape: [usize; 2],
}

/// Fixed-length sliding windows over the defined rows of a frame.
///
/// Rows inside any selected column's declared warm-up (head or tail) are
/// excluded up front; the frame itself is left untouched. Sample `i` covers
/// rows `first_row + i .. first_row + i + seq_len`.
#[derive(Debug, Clone)]
pub struct WindowDataset {
    feature_names: Vec<String>,
    label_name: String,
    seq_len: usize,
    first_row: usize,
    /// Row-major `[rows, n_features]` over the defined range.
    values: Vec<f32>,
    labels: Vec<f32>,
}

impl WindowDataset {
    pub fn new(frame: &FeatureFrame, config: &WindowConfig) -> Result<Self, DatasetError> {
        if config.seq_len == 0 {
            return Err(DatasetError::InvalidSeqLen);
        }

        let label_column = frame.get(&config.label)?;
        let feature_names: Vec<String> = match &config.features {
            Some(names) => names.clone(),
            None => frame
                .input_names()
                .into_iter()
                .filter(|n| *n != config.label)
                .map(str::to_string)
                .collect(),
        };

        let mut features = Vec::with_capacity(feature_names.len());
        for name in &feature_names {
            let column = frame.get(name)?;
            if name == &config.label || column.role() == ColumnRole::Label {
                return Err(DatasetError::LabelAsFeature(name.clone()));
            }
            features.push(column);
        }

        let mut selected: Vec<&str> = feature_names.iter().map(String::as_str).collect();
        selected.push(&config.label);
        let warmup = frame.warmup_of(&selected)?;
        let height = frame.height();
        let first_row = warmup.head.min(height);
        let end_row = height.saturating_sub(warmup.tail).max(first_row);

        let mut values = Vec::with_capacity((end_row - first_row) * features.len());
        let mut labels = Vec::with_capacity(end_row - first_row);
        for row in first_row..end_row {
            for column in &features {
                values.push(finite(column.name(), row, column.values()[row])?);
            }
            labels.push(finite(label_column.name(), row, label_column.values()[row])?);
        }

        tracing::debug!(
            symbol = frame.symbol(),
            first_row,
            end_row,
            n_features = feature_names.len(),
            "windowed dataset ready"
        );

        Ok(Self {
            feature_names,
            label_name: config.label.clone(),
            seq_len: config.seq_len,
            first_row,
            values,
            labels,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Frame rows `[start, end)` that samples are drawn from.
    pub fn row_range(&self) -> (usize, usize) {
        (self.first_row, self.first_row + self.labels.len())
    }
}

fn finite(column: &str, row: usize, value: f64) -> Result<f32, DatasetError> {
    if value.is_finite() {
        Ok(value as f32)
    } else {
        Err(DatasetError::NonFinite {
            column: column.to_string(),
            row,
        })
    }
}

impl Dataset for WindowDataset {
    type Item = WindowSample;

    fn len(&self) -> usize {
        (self.labels.len() + 1).saturating_sub(self.seq_len)
    }

    fn get(&self, index: usize) -> WindowSample {
        let width = self.n_features();
        let last = index + self.seq_len - 1;
        WindowSample {
            features: self.values[index * width..(last + 1) * width].to_vec(),
            label: self.labels[last],
            row: self.first_row + last,
            shape: [self.seq_len, width],
        }
    }
}
