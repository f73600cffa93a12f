//! End-to-end: OHLCV series → feature frame → windowed dataset → batches.

use chrono::NaiveDate;
use std::sync::Arc;
use stockprep_core::domain::{Bar, OhlcvSeries};
use stockprep_core::features::{FeatureFrameBuilder, FeaturePlan};
use stockprep_core::loader::{
    stacked, BatchingDataLoader, Dataset, DatasetError, LoaderOptions, WindowConfig, WindowDataset,
};
use stockprep_core::split::ValidationSplit;

fn make_series(n: usize) -> OhlcvSeries {
    let base_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let bars = (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + 10.0 * (t / 7.0).sin() + t * 0.05;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.4,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 10_000.0 + 500.0 * (t / 3.0).cos(),
            }
        })
        .collect();
    OhlcvSeries::new("SYN", bars).unwrap()
}

fn dataset(n: usize, seq_len: usize) -> WindowDataset {
    let frame = FeatureFrameBuilder::new(FeaturePlan::default())
        .unwrap()
        .build(&make_series(n))
        .unwrap();
    let config = WindowConfig {
        seq_len,
        ..WindowConfig::default()
    };
    WindowDataset::new(&frame, &config).unwrap()
}

fn options(batch_size: usize, shuffle: bool, split: ValidationSplit) -> LoaderOptions {
    LoaderOptions {
        batch_size,
        shuffle,
        validation_split: split,
        num_workers: 0,
    }
}

#[test]
fn default_plan_windows_skip_warmup_and_label_tail() {
    let ds = dataset(300, 20);

    // MACD is the longest warm-up (33 rows); FSMA_5 leaves 5 rows at the end.
    assert_eq!(ds.row_range(), (33, 295));
    assert_eq!(ds.len(), 262 - 20 + 1);
    assert_eq!(ds.n_features(), 5 + 16);
    assert!(!ds.feature_names().iter().any(|n| n == "FSMA_5"));

    let first = ds.get(0);
    assert_eq!(first.shape, [20, ds.n_features()]);
    assert_eq!(first.features.len(), 20 * ds.n_features());
    assert_eq!(first.row, 33 + 19);
    assert!(first.features.iter().all(|v| v.is_finite()));
    assert!(first.label.is_finite());
}

#[test]
fn train_and_validation_batches_cover_dataset_in_order() {
    let ds = Arc::new(dataset(300, 20));
    let n = ds.len();
    let train = BatchingDataLoader::new(Arc::clone(&ds), &options(16, false, ValidationSplit::Fraction(0.2)), stacked())
        .unwrap();
    let valid = train.split_validation().unwrap();

    let len_valid = (n as f64 * 0.2).round_ties_even() as usize;
    assert_eq!(valid.n_samples(), len_valid);
    assert_eq!(train.n_samples(), n - len_valid);
    assert!(Arc::ptr_eq(train.config(), valid.config()));

    let mut rows = Vec::new();
    for batch in train.iter().chain(valid.iter()) {
        assert_eq!(&batch.shape[1..], &[20, ds.n_features()]);
        assert_eq!(batch.features.len(), batch.len() * 20 * ds.n_features());
        assert_eq!(batch.labels.len(), batch.len());
        rows.extend(batch.rows);
    }

    // rows are the label rows of consecutive samples: strictly increasing by one
    assert_eq!(rows.len(), n);
    assert!(rows.windows(2).all(|w| w[1] == w[0] + 1));
}

#[test]
fn shuffle_request_is_overridden_by_split() {
    let ds = Arc::new(dataset(200, 10));
    let train = BatchingDataLoader::new(ds, &options(8, true, ValidationSplit::Count(25)), stacked()).unwrap();
    assert!(!train.shuffle());
    assert!(train.shuffle_overridden());
    let valid = train.split_validation().unwrap();
    assert!(!valid.shuffle());
    assert_eq!(valid.len(), 4);
}

#[test]
fn shuffled_loader_is_reproducible_across_passes() {
    let ds = Arc::new(dataset(200, 10));
    let loader = BatchingDataLoader::new(ds, &options(8, true, ValidationSplit::Count(0)), stacked()).unwrap();
    assert!(loader.shuffle());
    let first: Vec<Vec<usize>> = loader.iter().map(|b| b.rows).collect();
    let second: Vec<Vec<usize>> = loader.iter().map(|b| b.rows).collect();
    assert_eq!(first, second);
    let mut flat: Vec<usize> = first.into_iter().flatten().collect();
    let sorted = {
        let mut s = flat.clone();
        s.sort_unstable();
        s
    };
    assert_ne!(flat, sorted);
    flat.sort_unstable();
    assert_eq!(flat, sorted);
}

#[test]
fn worker_pool_produces_identical_batches() {
    let ds = Arc::new(dataset(250, 15));
    let sequential =
        BatchingDataLoader::new(Arc::clone(&ds), &options(9, false, ValidationSplit::Count(30)), stacked()).unwrap();
    let mut pooled_options = options(9, false, ValidationSplit::Count(30));
    pooled_options.num_workers = 4;
    let pooled = BatchingDataLoader::new(ds, &pooled_options, stacked()).unwrap();

    assert_eq!(sequential.iter().collect::<Vec<_>>(), pooled.iter().collect::<Vec<_>>());
}

#[test]
fn label_column_cannot_be_a_feature() {
    let frame = FeatureFrameBuilder::new(FeaturePlan::default())
        .unwrap()
        .build(&make_series(100))
        .unwrap();
    let config = WindowConfig {
        seq_len: 5,
        label: "FSMA_5".to_string(),
        features: Some(vec!["Close".to_string(), "FSMA_5".to_string()]),
    };
    assert_eq!(
        WindowDataset::new(&frame, &config).unwrap_err(),
        DatasetError::LabelAsFeature("FSMA_5".to_string())
    );
}
