//! Collate functions: turn the samples of one batch into a batch value.

use super::dataset::WindowSample;
use std::sync::Arc;

pub type CollateFn<T, B> = Arc<dyn Fn(Vec<T>) -> B + Send + Sync>;

/// Pass samples through as a `Vec`.
pub fn identity<T: 'static>() -> CollateFn<T, Vec<T>> {
    Arc::new(|samples: Vec<T>| samples)
}

/// [`stack_samples`] as a collate function.
pub fn stacked() -> CollateFn<WindowSample, SampleBatch> {
    Arc::new(stack_samples)
}

/// Stacked window samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    /// Row-major `[batch, seq_len, n_features]`.
    pub features: Vec<f32>,
    pub labels: Vec<f32>,
    /// Frame row each label was read from.
    pub rows: Vec<usize>,
    pub shape: [usize; 3],
}

impl SampleBatch {
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    pub fn is_empty(&self) -> bool {
        self.shape[0] == 0
    }
}

/// Default collate for [`WindowSample`]s.
pub fn stack_samples(samples: Vec<WindowSample>) -> SampleBatch {
    let [seq_len, n_features] = samples.first().map(|s| s.shape).unwrap_or([0, 0]);
    let mut batch = SampleBatch {
        features: Vec::with_capacity(samples.len() * seq_len * n_features),
        labels: Vec::with_capacity(samples.len()),
        rows: Vec::with_capacity(samples.len()),
        shape: [samples.len(), seq_len, n_features],
    };
    for sample in samples {
        batch.features.extend_from_slice(&sample.features);
        batch.labels.push(sample.label);
        batch.rows.push(sample.row);
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(row: usize) -> WindowSample {
        WindowSample {
            features: vec![row as f32; 4],
            label: row as f32 / 10.0,
            row,
            shape: [2, 2],
        }
    }

    #[test]
    fn stack_keeps_sample_order() {
        let batch = stack_samples(vec![sample(3), sample(4)]);
        assert_eq!(batch.shape, [2, 2, 2]);
        assert_eq!(batch.rows, vec![3, 4]);
        assert_eq!(&batch.features[..4], &[3.0; 4]);
        assert_eq!(&batch.features[4..], &[4.0; 4]);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn stack_empty() {
        let batch = stack_samples(Vec::new());
        assert!(batch.is_empty());
        assert_eq!(batch.shape, [0, 0, 0]);
    }

    #[test]
    fn identity_passes_through() {
        let collate = identity::<u8>();
        assert_eq!(collate(vec![1, 2]), vec![1, 2]);
    }
}
