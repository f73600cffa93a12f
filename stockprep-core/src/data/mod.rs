//! Tabular I/O: OHLCV ingestion and feature-frame export.

pub mod export;
pub mod ingest;
pub mod schema;

pub use export::{frame_to_dataframe, write_csv, write_frame, write_parquet};
pub use ingest::{dataframe_to_series, read_ohlcv, read_ohlcv_csv, read_ohlcv_parquet};
pub use schema::{DataError, OhlcvSchema};
