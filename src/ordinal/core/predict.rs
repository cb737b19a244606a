//! Nearest-midpoint class prediction from fitted weights and thresholds.
//!
//! Sorted distinct thresholds `u_0 < … < u_{m−1}` define the reference points
//!
//! ```text
//! μ = [-1, (u_0 + u_1)/2, …, (u_{m−2} + u_{m−1})/2]
//! ```
//!
//! and a sample with latent score `s = x·w` is assigned the index of the
//! closest `μ_k` in absolute distance, ties going to the lowest index. The
//! midpoints are recomputed on every call and never stored.
//!
//! Thresholds may be given per class or per sample: duplicates collapse
//! during deduplication, so both forms give identical predictions.
use crate::ordinal::{
    core::links::linear_scores,
    errors::{OrdinalError, OrdinalResult},
};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Reference point of the lowest class.
pub const FIRST_MIDPOINT: f64 = -1.0;

/// Sorted distinct threshold values.
///
/// # Errors
/// - [`OrdinalError::EmptyThresholds`] for an empty input.
/// - [`OrdinalError::NonFiniteThreshold`] for the first NaN/±inf entry.
pub fn unique_thresholds(thresholds: ArrayView1<f64>) -> OrdinalResult<Vec<f64>> {
    if thresholds.is_empty() {
        return Err(OrdinalError::EmptyThresholds);
    }
    if let Some((index, &value)) = thresholds.iter().enumerate().find(|(_, t)| !t.is_finite()) {
        return Err(OrdinalError::NonFiniteThreshold { index, value });
    }
    let mut unique = thresholds.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup();
    Ok(unique)
}

/// Midpoint vector `μ`; one entry per distinct threshold.
///
/// # Errors
/// Same as [`unique_thresholds`].
pub fn threshold_midpoints(thresholds: ArrayView1<f64>) -> OrdinalResult<Array1<f64>> {
    let unique = unique_thresholds(thresholds)?;
    let mut mu = Vec::with_capacity(unique.len());
    mu.push(FIRST_MIDPOINT);
    mu.extend(unique.windows(2).map(|pair| 0.5 * (pair[0] + pair[1])));
    Ok(Array1::from(mu))
}

/// Index of the midpoint closest to `score`; the first one wins ties.
pub fn nearest_midpoint(score: f64, midpoints: ArrayView1<f64>) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (k, &m) in midpoints.iter().enumerate() {
        let dist = (score - m).abs();
        if dist < best_dist {
            best = k;
            best_dist = dist;
        }
    }
    best
}

/// Predict a class rank for every row of `x`.
///
/// # Errors
/// - [`OrdinalError::FeatureCountMismatch`] when `x` and `weights` disagree.
/// - [`OrdinalError::NonFiniteFeature`] for a NaN/±inf feature.
/// - [`OrdinalError::NonFiniteParam`] for a NaN/±inf weight.
/// - Threshold errors from [`unique_thresholds`].
pub fn predict_classes(
    x: ArrayView2<f64>, weights: ArrayView1<f64>, thresholds: ArrayView1<f64>,
) -> OrdinalResult<Vec<usize>> {
    if x.ncols() != weights.len() {
        return Err(OrdinalError::FeatureCountMismatch {
            expected: weights.len(),
            actual: x.ncols(),
        });
    }
    if let Some((index, &value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
        return Err(OrdinalError::NonFiniteParam { index, value });
    }
    if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(OrdinalError::NonFiniteFeature { row, col, value });
    }
    let mu = threshold_midpoints(thresholds)?;
    let scores = linear_scores(x, weights);
    Ok(scores.iter().map(|&s| nearest_midpoint(s, mu.view())).collect())
}
