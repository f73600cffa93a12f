//! OHLCV ingestion from CSV and Parquet.

use super::schema::{DataError, OhlcvSchema};
use crate::domain::{Bar, OhlcvSeries};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Read a CSV file with a header row.
pub fn read_ohlcv_csv(path: &Path, symbol: &str) -> Result<OhlcvSeries, DataError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_try_parse_dates(true)
        .finish()?
        .collect()?;
    dataframe_to_series(&df, symbol)
}

pub fn read_ohlcv_parquet(path: &Path, symbol: &str) -> Result<OhlcvSeries, DataError> {
    let df = ParquetReader::new(File::open(path)?).finish()?;
    dataframe_to_series(&df, symbol)
}

/// Dispatch on the file extension (`.csv` or `.parquet`).
pub fn read_ohlcv(path: &Path, symbol: &str) -> Result<OhlcvSeries, DataError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_ohlcv_csv(path, symbol),
        Some("parquet") | Some("pq") => read_ohlcv_parquet(path, symbol),
        _ => Err(DataError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Convert a validated OHLCV table into a series. Null prices become NaN.
pub fn dataframe_to_series(df: &DataFrame, symbol: &str) -> Result<OhlcvSeries, DataError> {
    OhlcvSchema::validate(df)?;

    let dates = date_values(df)?;
    let [open, high, low, close, volume] = OhlcvSchema::PRICE_COLUMNS.map(|name| float_values(df, name));
    let (open, high, low, close, volume) = (open?, high?, low?, close?, volume?);

    let bars = dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| Bar {
            date,
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i],
        })
        .collect();

    let series = OhlcvSeries::new(symbol, bars)?;
    let void = series.bars().iter().filter(|b| b.is_void()).count();
    let insane = series.bars().iter().filter(|b| !b.is_void() && !b.is_sane()).count();
    if void > 0 || insane > 0 {
        tracing::warn!(symbol, void, insane, "series contains void or inconsistent bars");
    }
    tracing::debug!(symbol, bars = series.len(), "loaded OHLCV series");
    Ok(series)
}

fn float_values(df: &DataFrame, canonical: &str) -> Result<Vec<f64>, DataError> {
    let name = OhlcvSchema::resolve(df, canonical).ok_or_else(|| DataError::MissingColumn(canonical.to_string()))?;
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn date_values(df: &DataFrame) -> Result<Vec<NaiveDate>, DataError> {
    let name = OhlcvSchema::resolve(df, OhlcvSchema::DATE)
        .ok_or_else(|| DataError::MissingColumn(OhlcvSchema::DATE.to_string()))?;
    let column = df.column(name)?;

    if column.dtype() == &DataType::String {
        return column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or(DataError::NullDate(row))?;
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DataError::BadDate {
                    row,
                    value: value.to_string(),
                })
            })
            .collect();
    }

    // Date columns hold days since 1970-01-01.
    let epoch = NaiveDate::default();
    let column = column.cast(&DataType::Date)?;
    column
        .date()?
        .physical()
        .into_iter()
        .enumerate()
        .map(|(row, days)| {
            let days = days.ok_or(DataError::NullDate(row))?;
            Ok(epoch + chrono::Duration::days(days as i64))
        })
        .collect()
}
