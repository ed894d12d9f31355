//! Pluggable outlier scoring.
//!
//! The contract is deliberately small: a scorer returns one comparable
//! anomaly score per input vector, higher meaning more anomalous. The
//! specific algorithm is swappable without touching the rule-based
//! detectors or the aggregation logic.

use crate::features::FEATURE_DIM;

/// Scores feature vectors for anomaly. Implementations must be pure
/// over their input — no cross-run state.
pub trait OutlierScorer: Send + Sync {
    /// One score per vector, aligned by index. Higher = more anomalous.
    fn score(&self, vectors: &[[f64; FEATURE_DIM]]) -> Vec<f64>;
}

/// Default scorer: per-dimension z-score magnitude, averaged across
/// dimensions.
///
/// Dimensions with zero spread contribute nothing, so a constant
/// feature can neither hide nor fabricate an outlier.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanZScoreScorer;

impl OutlierScorer for MeanZScoreScorer {
    fn score(&self, vectors: &[[f64; FEATURE_DIM]]) -> Vec<f64> {
        if vectors.len() < 2 {
            return vec![0.0; vectors.len()];
        }

        let n = vectors.len() as f64;
        let mut means = [0.0f64; FEATURE_DIM];
        let mut stddevs = [0.0f64; FEATURE_DIM];

        for dim in 0..FEATURE_DIM {
            let mean = vectors.iter().map(|v| v[dim]).sum::<f64>() / n;
            let variance = vectors.iter().map(|v| (v[dim] - mean).powi(2)).sum::<f64>() / (n - 1.0);
            means[dim] = mean;
            stddevs[dim] = if variance.is_finite() && variance > 0.0 {
                variance.sqrt()
            } else {
                0.0
            };
        }

        vectors
            .iter()
            .map(|v| {
                let mut total = 0.0;
                for dim in 0..FEATURE_DIM {
                    if stddevs[dim] > 0.0 {
                        total += ((v[dim] - means[dim]) / stddevs[dim]).abs();
                    }
                }
                total / FEATURE_DIM as f64
            })
            .collect()
    }
}
