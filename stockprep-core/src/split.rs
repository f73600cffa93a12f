//! Deterministic train/validation splitting.
//!
//! The validation partition is always the most recent `len_valid` positions
//! and training is the prefix before it. Nothing is ever shuffled across
//! that boundary. The only randomness is a full permutation of the training
//! range when validation is disabled and the caller asks for shuffling, and
//! it comes from the splitter's own seeded generator.

use crate::sampler::SequentialSampler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_SEED: u64 = 0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplitError {
    #[error("validation set size {split} must be positive and smaller than the dataset ({n_samples} samples)")]
    InvalidCount { split: usize, n_samples: usize },

    #[error("validation fraction must be in [0, 1), got {0}")]
    InvalidFraction(f64),
}

/// Size of the validation partition: an absolute sample count or a fraction
/// of the dataset. Zero in either form disables validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationSplit {
    Count(usize),
    Fraction(f64),
}

impl Default for ValidationSplit {
    fn default() -> Self {
        ValidationSplit::Count(0)
    }
}

impl fmt::Display for ValidationSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationSplit::Count(k) => write!(f, "{k}"),
            ValidationSplit::Fraction(x) => write!(f, "{x}"),
        }
    }
}

impl ValidationSplit {
    pub fn is_disabled(&self) -> bool {
        match *self {
            ValidationSplit::Count(k) => k == 0,
            ValidationSplit::Fraction(x) => x == 0.0,
        }
    }

    /// Number of validation samples out of `n_samples`, validating the split.
    pub fn len_valid(&self, n_samples: usize) -> Result<usize, SplitError> {
        match *self {
            ValidationSplit::Count(0) => Ok(0),
            ValidationSplit::Count(k) => {
                if k >= n_samples {
                    return Err(SplitError::InvalidCount { split: k, n_samples });
                }
                Ok(k)
            }
            ValidationSplit::Fraction(x) => {
                if !(0.0..1.0).contains(&x) {
                    return Err(SplitError::InvalidFraction(x));
                }
                // ties go to the even count: 10 * 0.25 = 2.5 -> 2
                Ok((n_samples as f64 * x).round_ties_even() as usize)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainValidSamplers {
    pub train: SequentialSampler,
    pub valid: SequentialSampler,
}

#[derive(Debug, Clone)]
pub struct SequentialSplitter {
    rng: StdRng,
}

impl Default for SequentialSplitter {
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

impl SequentialSplitter {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Partition `0..n_samples` into a training prefix and a validation
    /// suffix. `Ok(None)` means validation is disabled.
    pub fn split(
        &mut self,
        n_samples: usize,
        split: ValidationSplit,
    ) -> Result<Option<TrainValidSamplers>, SplitError> {
        let len_valid = split.len_valid(n_samples)?;
        if split.is_disabled() {
            return Ok(None);
        }

        let boundary = n_samples - len_valid;
        if len_valid == 0 {
            tracing::warn!(n_samples, %split, "validation partition is empty");
        }
        if boundary == 0 {
            tracing::warn!(n_samples, %split, "training partition is empty");
        }

        Ok(Some(TrainValidSamplers {
            train: SequentialSampler::from_range(0..boundary),
            valid: SequentialSampler::from_range(boundary..n_samples),
        }))
    }

    /// A permutation of `0..n_samples` drawn from this splitter's generator.
    pub fn shuffled(&mut self, n_samples: usize) -> SequentialSampler {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut self.rng);
        SequentialSampler::from_indices(indices)
    }
}
