//! Property tests for splitting and batching invariants.
//!
//! Uses proptest to verify:
//! 1. Partition: train and validation are disjoint, cover the range, and
//!    validation is exactly the tail
//! 2. Idempotence: splitting twice gives the same samplers
//! 3. Fraction sizing: the validation length is the nearest integer to
//!    n * fraction, with exact halves going to the even count
//! 4. Batching: a loader visits its sampler in order, once per pass

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use stockprep_core::loader::{identity, BatchingDataLoader, LoaderOptions};
use stockprep_core::split::{SequentialSplitter, SplitError, ValidationSplit};

// ── Strategies (proptest) ────────────────────────────────────────────

/// A dataset size and a valid integer split for it.
fn arb_count_split() -> impl Strategy<Value = (usize, usize)> {
    (2usize..2_000).prop_flat_map(|n| (Just(n), 1..n))
}

fn arb_fraction() -> impl Strategy<Value = f64> {
    (1..1000u32).prop_map(|k| f64::from(k) / 1000.0)
}

// ── 1. Partition ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn count_split_partitions_range((n, k) in arb_count_split()) {
        let parts = SequentialSplitter::default()
            .split(n, ValidationSplit::Count(k))
            .unwrap()
            .unwrap();

        let train: Vec<usize> = parts.train.iter().collect();
        let valid: Vec<usize> = parts.valid.iter().collect();

        prop_assert_eq!(valid.len(), k);
        prop_assert_eq!(train.len() + valid.len(), n);
        prop_assert_eq!(train, (0..n - k).collect::<Vec<_>>());
        prop_assert_eq!(valid, (n - k..n).collect::<Vec<_>>());
    }

    #[test]
    fn fraction_split_is_disjoint_and_complete(n in 1usize..2_000, x in arb_fraction()) {
        let parts = SequentialSplitter::default()
            .split(n, ValidationSplit::Fraction(x))
            .unwrap()
            .unwrap();

        let train: HashSet<usize> = parts.train.iter().collect();
        let valid: HashSet<usize> = parts.valid.iter().collect();

        prop_assert!(train.is_disjoint(&valid));
        prop_assert_eq!(train.len() + valid.len(), n);
        // every validation index is later than every training index
        if let (Some(t), Some(v)) = (train.iter().max(), valid.iter().min()) {
            prop_assert!(t < v);
        }
    }
}

// ── 2. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn split_is_idempotent((n, k) in arb_count_split(), seed in any::<u64>()) {
        let split = ValidationSplit::Count(k);
        let mut splitter = SequentialSplitter::seeded(seed);
        let first = splitter.split(n, split).unwrap();
        let second = splitter.split(n, split).unwrap();
        let fresh = SequentialSplitter::default().split(n, split).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &fresh);
    }
}

// ── 3. Fraction sizing ───────────────────────────────────────────────

proptest! {
    #[test]
    fn fraction_length_is_nearest_integer(n in 1usize..5_000, x in arb_fraction()) {
        let len = ValidationSplit::Fraction(x).len_valid(n).unwrap();
        let exact = n as f64 * x;
        prop_assert!((len as f64 - exact).abs() <= 0.5, "{len} is not nearest to {exact}");
    }

    #[test]
    fn fraction_half_ties_go_to_even(k in 0usize..1_000) {
        // n * 0.5 lands exactly on k + 0.5 for odd n = 2k + 1
        let n = 2 * k + 1;
        let len = ValidationSplit::Fraction(0.5).len_valid(n).unwrap();
        prop_assert_eq!(len % 2, 0);
        prop_assert!(len == k || len == k + 1);
    }

    #[test]
    fn out_of_range_count_rejected(n in 1usize..500, extra in 0usize..10) {
        let k = n + extra;
        let err = SequentialSplitter::default().split(n, ValidationSplit::Count(k)).unwrap_err();
        prop_assert_eq!(err, SplitError::InvalidCount { split: k, n_samples: n });
    }

    #[test]
    fn out_of_range_fraction_rejected(x in prop_oneof![1.0..10.0f64, -10.0..-0.0001f64]) {
        let result = SequentialSplitter::default().split(100, ValidationSplit::Fraction(x));
        prop_assert_eq!(result, Err(SplitError::InvalidFraction(x)));
    }
}

#[test]
fn fraction_ties_round_to_even_count() {
    let cases = [(10, 0.25, 2), (2, 0.25, 0), (6, 0.25, 2), (14, 0.25, 4), (5, 0.5, 2), (7, 0.5, 4)];
    for (n, x, expected) in cases {
        assert_eq!(ValidationSplit::Fraction(x).len_valid(n).unwrap(), expected, "n = {n}, x = {x}");
    }
}

// ── 4. Batching ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn loader_visits_sampler_once_in_order(
        (n, k) in arb_count_split(),
        batch_size in 1usize..64,
        shuffle in any::<bool>(),
    ) {
        let options = LoaderOptions {
            batch_size,
            shuffle,
            validation_split: ValidationSplit::Count(k),
            num_workers: 0,
        };
        let train = BatchingDataLoader::new(Arc::new((0..n).collect::<Vec<usize>>()), &options, identity()).unwrap();
        let valid = train.split_validation().unwrap();

        prop_assert!(!train.shuffle());
        prop_assert_eq!(train.shuffle_overridden(), shuffle);

        let train_batches: Vec<Vec<usize>> = train.iter().collect();
        prop_assert_eq!(train_batches.len(), train.len());
        prop_assert!(train_batches.iter().all(|b| !b.is_empty() && b.len() <= batch_size));

        let seen: Vec<usize> = train_batches
            .into_iter()
            .flatten()
            .chain(valid.iter().flatten())
            .collect();
        prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());
    }
}
