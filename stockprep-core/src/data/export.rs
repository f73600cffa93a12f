//! FeatureFrame export to polars, CSV and Parquet.
//!
//! NaN values (warm-up regions, undefined labels) are written as nulls.

use super::schema::DataError;
use crate::frame::FeatureFrame;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Date column first, then every frame column in order.
pub fn frame_to_dataframe(frame: &FeatureFrame) -> Result<DataFrame, DataError> {
    // Date columns hold days since 1970-01-01.
    let epoch = NaiveDate::default();
    let days: Vec<i32> = frame
        .dates()
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();

    let mut columns = Vec::with_capacity(frame.width() + 1);
    columns.push(Column::new("Date".into(), days).cast(&DataType::Date)?);
    for column in frame.columns() {
        let values: Vec<Option<f64>> = column
            .values()
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v) })
            .collect();
        columns.push(Column::new(column.name().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

pub fn write_csv(frame: &FeatureFrame, path: &Path) -> Result<(), DataError> {
    let mut df = frame_to_dataframe(frame)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

pub fn write_parquet(frame: &FeatureFrame, path: &Path) -> Result<(), DataError> {
    let mut df = frame_to_dataframe(frame)?;
    let file = File::create(path)?;
    ParquetWriter::new(file).finish(&mut df)?;
    Ok(())
}

/// Dispatch on the file extension (`.csv` or `.parquet`).
pub fn write_frame(frame: &FeatureFrame, path: &Path) -> Result<(), DataError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(frame, path),
        Some("parquet") | Some("pq") => write_parquet(frame, path),
        _ => Err(DataError::UnsupportedFormat(path.to_path_buf())),
    }
}
