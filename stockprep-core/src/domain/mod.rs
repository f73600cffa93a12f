//! Domain types: bars and validated OHLCV series.

pub mod bar;

pub use bar::{Bar, OhlcvSeries, SeriesError};
