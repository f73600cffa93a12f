//! Batching data loader with a deterministic validation split.
//!
//! A loader owns one sampler (training, or the full range when validation
//! is disabled) and, when a split was requested, keeps the validation
//! sampler aside until [`BatchingDataLoader::split_validation`] is called.
//! Both loaders share one [`LoaderConfig`] through an `Arc`; only the
//! sampler differs.
//!
//! Shuffling and a validation split are mutually exclusive. Asking for both
//! disables shuffling and logs the override.

pub mod collate;
pub mod dataset;

pub use collate::{identity, stack_samples, stacked, CollateFn, SampleBatch};
pub use dataset::{Dataset, DatasetError, WindowConfig, WindowDataset, WindowSample};

use crate::sampler::SequentialSampler;
use crate::split::{SequentialSplitter, SplitError, ValidationSplit};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("batch size must be >= 1")]
    InvalidBatchSize,

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("failed to build loader worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Loader parameters as they appear in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub batch_size: usize,
    pub shuffle: bool,
    pub validation_split: ValidationSplit,
    pub num_workers: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            shuffle: false,
            validation_split: ValidationSplit::default(),
            num_workers: 0,
        }
    }
}

/// Everything a training loader and its validation sibling have in common.
/// Immutable once built.
pub struct LoaderConfig<D: Dataset, B> {
    dataset: Arc<D>,
    batch_size: usize,
    shuffle: bool,
    collate: CollateFn<D::Item, B>,
    num_workers: usize,
    pool: Option<rayon::ThreadPool>,
}

impl<D: Dataset, B> LoaderConfig<D, B> {
    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Effective shuffle flag, after any override.
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Fetch the samples at `indices` and collate them, preserving order.
    fn fetch(&self, indices: &[usize]) -> B {
        let samples: Vec<D::Item> = match &self.pool {
            Some(pool) => pool.install(|| indices.par_iter().map(|&i| self.dataset.get(i)).collect()),
            None => indices.iter().map(|&i| self.dataset.get(i)).collect(),
        };
        (self.collate)(samples)
    }
}

impl<D: Dataset, B> fmt::Debug for LoaderConfig<D, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("n_samples", &self.dataset.len())
            .field("batch_size", &self.batch_size)
            .field("shuffle", &self.shuffle)
            .field("num_workers", &self.num_workers)
            .finish()
    }
}

pub struct BatchingDataLoader<D: Dataset, B> {
    config: Arc<LoaderConfig<D, B>>,
    sampler: SequentialSampler,
    valid_sampler: Option<SequentialSampler>,
    validation_split: ValidationSplit,
    shuffle_overridden: bool,
}

impl<D: Dataset, B> BatchingDataLoader<D, B> {
    /// Build a loader with the default splitter (seed 0).
    pub fn new(
        dataset: Arc<D>,
        options: &LoaderOptions,
        collate: CollateFn<D::Item, B>,
    ) -> Result<Self, LoaderError> {
        Self::with_splitter(dataset, options, collate, SequentialSplitter::default())
    }

    pub fn with_splitter(
        dataset: Arc<D>,
        options: &LoaderOptions,
        collate: CollateFn<D::Item, B>,
        mut splitter: SequentialSplitter,
    ) -> Result<Self, LoaderError> {
        if options.batch_size == 0 {
            return Err(LoaderError::InvalidBatchSize);
        }

        let n_samples = dataset.len();
        let parts = splitter.split(n_samples, options.validation_split)?;

        let shuffle_overridden = options.shuffle && parts.is_some();
        if shuffle_overridden {
            tracing::warn!(
                validation_split = %options.validation_split,
                "shuffle is incompatible with a validation split; shuffle disabled"
            );
        }
        let shuffle = options.shuffle && !shuffle_overridden;

        let (sampler, valid_sampler) = match parts {
            Some(parts) => (parts.train, Some(parts.valid)),
            None if shuffle => (splitter.shuffled(n_samples), None),
            None => (SequentialSampler::from_range(0..n_samples), None),
        };

        let pool = if options.num_workers > 0 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(options.num_workers)
                    .thread_name(|i| format!("stockprep-loader-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(LoaderConfig {
                dataset,
                batch_size: options.batch_size,
                shuffle,
                collate,
                num_workers: options.num_workers,
                pool,
            }),
            sampler,
            valid_sampler,
            validation_split: options.validation_split,
            shuffle_overridden,
        })
    }

    pub fn config(&self) -> &Arc<LoaderConfig<D, B>> {
        &self.config
    }

    pub fn sampler(&self) -> &SequentialSampler {
        &self.sampler
    }

    pub fn shuffle(&self) -> bool {
        self.config.shuffle
    }

    /// True if shuffle was requested but turned off because of the split.
    pub fn shuffle_overridden(&self) -> bool {
        self.shuffle_overridden
    }

    pub fn validation_split(&self) -> ValidationSplit {
        self.validation_split
    }

    /// Number of samples this loader visits per pass.
    pub fn n_samples(&self) -> usize {
        self.sampler.len()
    }

    /// Number of batches per pass. The last batch may be short.
    pub fn len(&self) -> usize {
        self.sampler.len().div_ceil(self.config.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.sampler.is_empty()
    }

    /// One pass over the sampler. Every call replays the same sequence.
    pub fn iter(&self) -> Batches<'_, D, B> {
        Batches {
            config: &self.config,
            chunks: self.sampler.as_slice().chunks(self.config.batch_size),
        }
    }

    /// A loader over the validation partition that shares this loader's
    /// configuration. `None` when validation is disabled.
    pub fn split_validation(&self) -> Option<Self> {
        let sampler = self.valid_sampler.clone()?;
        Some(Self {
            config: Arc::clone(&self.config),
            sampler,
            valid_sampler: None,
            validation_split: self.validation_split,
            shuffle_overridden: self.shuffle_overridden,
        })
    }
}

impl<D: Dataset, B> Clone for BatchingDataLoader<D, B> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            sampler: self.sampler.clone(),
            valid_sampler: self.valid_sampler.clone(),
            validation_split: self.validation_split,
            shuffle_overridden: self.shuffle_overridden,
        }
    }
}

impl<D: Dataset, B> fmt::Debug for BatchingDataLoader<D, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchingDataLoader")
            .field("config", &self.config)
            .field("n_samples", &self.sampler.len())
            .field("has_validation", &self.valid_sampler.is_some())
            .field("shuffle_overridden", &self.shuffle_overridden)
            .finish()
    }
}

impl<'a, D: Dataset, B> IntoIterator for &'a BatchingDataLoader<D, B> {
    type Item = B;
    type IntoIter = Batches<'a, D, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the batches of one pass.
pub struct Batches<'a, D: Dataset, B> {
    config: &'a LoaderConfig<D, B>,
    chunks: std::slice::Chunks<'a, usize>,
}

impl<D: Dataset, B> Iterator for Batches<'_, D, B> {
    type Item = B;

    fn next(&mut self) -> Option<B> {
        let indices = self.chunks.next()?;
        Some(self.config.fetch(indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<D: Dataset, B> ExactSizeIterator for Batches<'_, D, B> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(n: usize, options: LoaderOptions) -> BatchingDataLoader<Vec<usize>, Vec<usize>> {
        BatchingDataLoader::new(Arc::new((0..n).collect()), &options, identity()).unwrap()
    }

    fn opts(batch_size: usize, shuffle: bool, split: ValidationSplit) -> LoaderOptions {
        LoaderOptions {
            batch_size,
            shuffle,
            validation_split: split,
            num_workers: 0,
        }
    }

    #[test]
    fn batches_follow_sampler_order() {
        let l = loader(10, opts(4, false, ValidationSplit::Count(0)));
        let batches: Vec<_> = l.iter().collect();
        assert_eq!(batches, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]]);
        assert_eq!(l.len(), 3);
        assert_eq!(l.n_samples(), 10);
        assert!(l.split_validation().is_none());
    }

    #[test]
    fn split_validation_shares_config() {
        let train = loader(10, opts(4, false, ValidationSplit::Count(3)));
        let valid = train.split_validation().unwrap();
        assert!(Arc::ptr_eq(train.config(), valid.config()));
        assert_eq!(train.iter().flatten().collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
        assert_eq!(valid.iter().collect::<Vec<_>>(), vec![vec![7, 8, 9]]);
        // the validation loader has no further split
        assert!(valid.split_validation().is_none());
    }

    #[test]
    fn shuffle_with_split_is_overridden() {
        let l = loader(10, opts(2, true, ValidationSplit::Fraction(0.2)));
        assert!(!l.shuffle());
        assert!(l.shuffle_overridden());
        assert_eq!(l.sampler().as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn shuffle_without_split_is_a_fixed_permutation() {
        let a = loader(20, opts(5, true, ValidationSplit::Count(0)));
        let b = loader(20, opts(5, true, ValidationSplit::Count(0)));
        assert!(a.shuffle());
        assert_eq!(a.sampler(), b.sampler());
        let first: Vec<_> = a.iter().collect();
        let second: Vec<_> = a.iter().collect();
        assert_eq!(first, second);
        let mut all: Vec<usize> = first.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn zero_batch_size_rejected() {
        let err = BatchingDataLoader::new(Arc::new(vec![1u8]), &opts(0, false, ValidationSplit::Count(0)), identity())
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidBatchSize));
    }

    #[test]
    fn invalid_split_propagates() {
        let err = BatchingDataLoader::new(
            Arc::new(vec![1u8, 2, 3]),
            &opts(1, false, ValidationSplit::Count(3)),
            identity(),
        )
        .unwrap_err();
        assert!(matches!(err, LoaderError::Split(SplitError::InvalidCount { .. })));
    }

    #[test]
    fn worker_pool_matches_sequential() {
        let mut options = opts(7, false, ValidationSplit::Count(5));
        let sequential = loader(50, options.clone());
        options.num_workers = 3;
        let pooled = loader(50, options);
        assert_eq!(pooled.config().num_workers(), 3);
        assert_eq!(sequential.iter().collect::<Vec<_>>(), pooled.iter().collect::<Vec<_>>());
        let sv = sequential.split_validation().unwrap();
        let pv = pooled.split_validation().unwrap();
        assert_eq!(sv.iter().collect::<Vec<_>>(), pv.iter().collect::<Vec<_>>());
    }

    #[test]
    fn options_from_toml() {
        let options: LoaderOptions = toml::from_str("batch_size = 64\nvalidation_split = 0.1").unwrap();
        assert_eq!(options.batch_size, 64);
        assert_eq!(options.validation_split, ValidationSplit::Fraction(0.1));
        assert!(!options.shuffle);
    }
}
