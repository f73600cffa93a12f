use polars::prelude::*;
use std::path::PathBuf;

use crate::domain::SeriesError;

/// Errors from reading or writing tabular OHLCV and feature data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: got {actual:?}")]
    TypeMismatch { column: String, actual: DataType },

    #[error("Unparseable date {value:?} at row {row}")]
    BadDate { row: usize, value: String },

    #[error("Null date at row {0}")]
    NullDate(usize),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("polars: {0}")]
    Polars(#[from] PolarsError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Expected layout of OHLCV input tables.
///
/// Column names are matched in their capitalised form first (`Close`), then
/// lower-case (`close`).
pub struct OhlcvSchema;

impl OhlcvSchema {
    pub const DATE: &'static str = "Date";
    pub const PRICE_COLUMNS: [&'static str; 5] = ["Open", "High", "Low", "Close", "Volume"];

    /// The name under which `canonical` appears in `df`, if any.
    pub fn resolve<'a>(df: &'a DataFrame, canonical: &str) -> Option<&'a str> {
        let lower = canonical.to_lowercase();
        df.get_column_names()
            .into_iter()
            .find(|n| n.as_str() == canonical)
            .or_else(|| df.get_column_names().into_iter().find(|n| n.as_str() == lower))
            .map(|n| n.as_str())
    }

    /// Check that every column exists with a usable type.
    pub fn validate(df: &DataFrame) -> Result<(), DataError> {
        let date = Self::resolve(df, Self::DATE).ok_or_else(|| DataError::MissingColumn(Self::DATE.to_string()))?;
        let dtype = df.column(date)?.dtype();
        if !matches!(dtype, DataType::String | DataType::Date | DataType::Datetime(_, _)) {
            return Err(DataError::TypeMismatch {
                column: date.to_string(),
                actual: dtype.clone(),
            });
        }

        for canonical in Self::PRICE_COLUMNS {
            let name = Self::resolve(df, canonical).ok_or_else(|| DataError::MissingColumn(canonical.to_string()))?;
            let dtype = df.column(name)?.dtype();
            if !is_numeric(dtype) {
                return Err(DataError::TypeMismatch {
                    column: name.to_string(),
                    actual: dtype.clone(),
                });
            }
        }

        Ok(())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(date_name: &str, close_name: &str) -> DataFrame {
        DataFrame::new(vec![
            Column::new(date_name.into(), &["2024-01-02"]),
            Column::new("Open".into(), &[400.0]),
            Column::new("High".into(), &[405.0]),
            Column::new("Low".into(), &[399.0]),
            Column::new(close_name.into(), &[403.0]),
            Column::new("Volume".into(), &[1_000_000i64]),
        ])
        .unwrap()
    }

    #[test]
    fn accepts_capitalised_and_lower_case() {
        OhlcvSchema::validate(&frame("Date", "Close")).unwrap();
        OhlcvSchema::validate(&frame("date", "close")).unwrap();
    }

    #[test]
    fn rejects_missing_column() {
        let df = frame("Date", "Adj Close");
        assert!(matches!(
            OhlcvSchema::validate(&df),
            Err(DataError::MissingColumn(c)) if c == "Close"
        ));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let df = DataFrame::new(vec![
            Column::new("Date".into(), &["2024-01-02"]),
            Column::new("Open".into(), &["x"]),
            Column::new("High".into(), &[1.0]),
            Column::new("Low".into(), &[1.0]),
            Column::new("Close".into(), &[1.0]),
            Column::new("Volume".into(), &[1.0]),
        ])
        .unwrap();
        assert!(matches!(
            OhlcvSchema::validate(&df),
            Err(DataError::TypeMismatch { .. })
        ));
    }
}
