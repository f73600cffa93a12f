//! FeatureFrame: the enriched, date-indexed table of one instrument.
//!
//! Columns are kept in insertion order and tagged with a [`ColumnRole`], so
//! downstream code can tell model inputs from supervised-learning targets.
//! Every column has exactly one value per input bar; warm-up regions hold
//! `f64::NAN` and are never filled or dropped here.

use crate::domain::OhlcvSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

/// What a column is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Raw OHLCV input.
    Base,
    /// Indicator computed from present and past rows only.
    Feature,
    /// Forward-looking target. Never a model input.
    Label,
}

/// Rows at the start (`head`) and end (`tail`) of a column that are
/// undefined by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Warmup {
    pub head: usize,
    pub tail: usize,
}

impl Warmup {
    pub const NONE: Warmup = Warmup { head: 0, tail: 0 };

    pub fn head(n: usize) -> Self {
        Self { head: n, tail: 0 }
    }

    pub fn tail(n: usize) -> Self {
        Self { head: 0, tail: n }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("column {column} has {actual} rows, frame has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    name: String,
    role: ColumnRole,
    warmup: Warmup,
    values: Vec<f64>,
}

impl FrameColumn {
    pub fn new(name: impl Into<String>, role: ColumnRole, warmup: Warmup, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            role,
            warmup,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ColumnRole {
        self.role
    }

    pub fn warmup(&self) -> Warmup {
        self.warmup
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    symbol: String,
    dates: Vec<NaiveDate>,
    columns: Vec<FrameColumn>,
}

impl FeatureFrame {
    /// Start a frame from a series: the date index plus the five base columns.
    pub fn from_series(series: &OhlcvSeries) -> Self {
        let base = [
            (OPEN, series.field(|b| b.open)),
            (HIGH, series.field(|b| b.high)),
            (LOW, series.field(|b| b.low)),
            (CLOSE, series.field(|b| b.close)),
            (VOLUME, series.field(|b| b.volume)),
        ];
        Self {
            symbol: series.symbol().to_string(),
            dates: series.dates(),
            columns: base
                .into_iter()
                .map(|(name, values)| FrameColumn::new(name, ColumnRole::Base, Warmup::NONE, values))
                .collect(),
        }
    }

    /// An empty-columned frame over an explicit date index.
    pub fn with_index(symbol: impl Into<String>, dates: Vec<NaiveDate>) -> Self {
        Self {
            symbol: symbol.into(),
            dates,
            columns: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows (equal to the input bar count).
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn columns(&self) -> &[FrameColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&FrameColumn, FrameError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Result<&[f64], FrameError> {
        self.get(name).map(FrameColumn::values)
    }

    /// Names of all columns with the given role, in frame order.
    pub fn names_with_role(&self, role: ColumnRole) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role == role)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of every column a model may consume (base + feature).
    pub fn input_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role != ColumnRole::Label)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.names_with_role(ColumnRole::Label)
    }

    /// Append a column. Fails if the length differs from the frame height.
    /// A column whose name already exists is left untouched.
    pub fn push_column(&mut self, column: FrameColumn) -> Result<(), FrameError> {
        if column.values.len() != self.height() {
            return Err(FrameError::LengthMismatch {
                column: column.name,
                expected: self.height(),
                actual: column.values.len(),
            });
        }
        if !self.contains(&column.name) {
            self.columns.push(column);
        }
        Ok(())
    }

    /// Idempotent add-if-absent.
    ///
    /// If `name` already exists the frame is returned as is and `compute` is
    /// never called. Otherwise `compute` sees the current frame and its
    /// output is appended under `name`.
    pub fn with_column_if_absent<E, F>(
        mut self,
        name: &str,
        role: ColumnRole,
        warmup: Warmup,
        compute: F,
    ) -> Result<Self, E>
    where
        E: From<FrameError>,
        F: FnOnce(&FeatureFrame) -> Result<Vec<f64>, E>,
    {
        if self.contains(name) {
            tracing::trace!(column = name, "column already present, skipping");
            return Ok(self);
        }
        let values = compute(&self)?;
        self.push_column(FrameColumn::new(name, role, warmup, values))?;
        Ok(self)
    }

    /// The widest declared warm-up over the named columns.
    pub fn warmup_of(&self, names: &[&str]) -> Result<Warmup, FrameError> {
        let mut combined = Warmup::NONE;
        for name in names {
            let w = self.get(name)?.warmup;
            combined.head = combined.head.max(w.head);
            combined.tail = combined.tail.max(w.tail);
        }
        Ok(combined)
    }
}
