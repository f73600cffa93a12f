//! Sequential sampler: a fixed, pre-computed list of dataset positions.

use std::ops::Range;
use std::sync::Arc;

/// Yields its indices in stored order, the same way on every pass.
///
/// Cloning is cheap: the index list is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialSampler {
    indices: Arc<[usize]>,
}

impl SequentialSampler {
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            indices: range.collect(),
        }
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}
