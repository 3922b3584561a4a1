//! Synthetic reference stimuli for the receptor-noise scale.
//!
//! Distances to a fixed set of extreme stimuli let callers place samples in a
//! perceptual coordinate frame: one pure stimulus per chromatic channel plus
//! an achromatic limit stimulus.

use ndarray::Array2;

/// Log-transformed catch of the stimulated channel in a pure stimulus.
pub const REFERENCE_PEAK: f64 = 10.0;

/// Log-transformed catch of every unstimulated channel.
pub const REFERENCE_FLOOR: f64 = 1e-4;

/// Label prefix shared by all reference stimuli.
pub const REFERENCE_PREFIX: &str = "ref.";

/// Log-space reference stimuli for `channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceStimuli {
    pub labels: Vec<String>,
    /// `(channels + 1) x channels` log-transformed catches.
    pub log_catches: Array2<f64>,
}

impl ReferenceStimuli {
    pub fn new(channels: &[String]) -> Self {
        let k = channels.len();
        let log_catches = Array2::from_shape_fn((k + 1, k), |(row, col)| {
            if row == col {
                REFERENCE_PEAK
            } else {
                REFERENCE_FLOOR
            }
        });
        let labels = channels
            .iter()
            .map(|c| format!("{REFERENCE_PREFIX}{c}"))
            .chain(std::iter::once(format!("{REFERENCE_PREFIX}achro")))
            .collect();
        Self {
            labels,
            log_catches,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Linear catches matching [`Self::log_catches`].
    pub fn linear_catches(&self) -> Array2<f64> {
        self.log_catches.mapv(f64::exp)
    }
}

/// Pairs over `samples + references` rows that involve at least one reference.
///
/// Indices address the stacked rows (samples first); canonical order is kept.
pub fn reference_pairs(samples: usize, references: usize) -> Vec<(usize, usize)> {
    let total = samples + references;
    (0..total)
        .flat_map(|i| (i + 1..total).map(move |j| (i, j)))
        .filter(|&(_, j)| j >= samples)
        .collect()
}
