//! Link functions of the ordinal logistic model.
//!
//! For a sample with linear score `s = x·w` and class rank `r`, the model
//! assigns its bin the probability mass
//!
//! ```text
//! P_upper − P_lower = σ(θ[r] − s) − σ(θ[r−1] − s)
//! ```
//!
//! where the lower boundary of the lowest class is open. That open boundary
//! is an explicit [`ThresholdBound::Unbounded`] rather than a `-∞` float, so
//! only [`ThresholdBound::cdf`] has to know that it contributes zero mass.
use crate::optimization::numerical_stability::transformations::safe_logistic;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Lower boundary of a sample's ordinal bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdBound {
    /// Finite boundary value.
    Bounded(f64),
    /// Open lower end of the lowest class.
    Unbounded,
}

impl ThresholdBound {
    /// Probability that a latent score `score` lies below this boundary:
    /// `σ(t − score)`, or exactly `0` when unbounded.
    pub fn cdf(&self, score: f64) -> f64 {
        match *self {
            ThresholdBound::Bounded(t) => safe_logistic(t - score),
            ThresholdBound::Unbounded => 0.0,
        }
    }

    /// Boundary value as a float, with `Unbounded` mapped to `-∞`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            ThresholdBound::Bounded(t) => t,
            ThresholdBound::Unbounded => f64::NEG_INFINITY,
        }
    }
}

/// Lower boundary of class `rank` given per-class thresholds.
pub fn lower_bound(thresholds: ArrayView1<f64>, rank: usize) -> ThresholdBound {
    if rank == 0 { ThresholdBound::Unbounded } else { ThresholdBound::Bounded(thresholds[rank - 1]) }
}

/// Latent scores `X·w`.
pub fn linear_scores(x: ArrayView2<f64>, w: ArrayView1<f64>) -> Array1<f64> {
    x.dot(&w)
}

/// `P_upper[i] = σ(θ[rank_i] − s_i)`.
pub fn p_upper(
    x: ArrayView2<f64>, thresholds: ArrayView1<f64>, w: ArrayView1<f64>, ranks: &[usize],
) -> Array1<f64> {
    let scores = linear_scores(x, w);
    scores.iter().zip(ranks).map(|(&s, &r)| safe_logistic(thresholds[r] - s)).collect()
}

/// `P_lower[i] = σ(θ[rank_i − 1] − s_i)`, or `0` for the lowest class.
pub fn p_lower(
    x: ArrayView2<f64>, thresholds: ArrayView1<f64>, w: ArrayView1<f64>, ranks: &[usize],
) -> Array1<f64> {
    let scores = linear_scores(x, w);
    scores.iter().zip(ranks).map(|(&s, &r)| lower_bound(thresholds, r).cdf(s)).collect()
}

/// `ln(σ(upper − s) − lower.cdf(s))` without forming the difference.
///
/// Uses `σ(u) − σ(v) = σ(u)·σ(−v)·(1 − e^{v−u})`, which keeps precision when
/// both probabilities saturate near 1. A crossed or collapsed bin
/// (`lower ≥ upper`) yields `-∞` or `NaN`, exactly like the naive log.
pub fn log_bin_mass(upper: f64, lower: ThresholdBound, score: f64) -> f64 {
    let u = upper - score;
    let log_upper = -softplus(-u);
    match lower {
        ThresholdBound::Unbounded => log_upper,
        ThresholdBound::Bounded(t) => {
            let v = t - score;
            log_upper - softplus(v) + (-(v - u).exp_m1()).ln()
        }
    }
}

/// Partial derivatives of [`log_bin_mass`] with respect to the upper and
/// lower arguments `u = upper − s` and `v = lower − s`.
///
/// ```text
/// ∂/∂u =  σ(−u) + 1/(e^{u−v} − 1)
/// ∂/∂v = −σ(v)  − 1/(e^{u−v} − 1)
/// ```
///
/// Equal to `a(1−a)/(a−b)` and `−b(1−b)/(a−b)` wherever `a − b` is
/// representable; `∂/∂v` is `0` for the open lower boundary.
pub fn log_bin_mass_partials(upper: f64, lower: ThresholdBound, score: f64) -> (f64, f64) {
    let u = upper - score;
    match lower {
        ThresholdBound::Unbounded => (safe_logistic(-u), 0.0),
        ThresholdBound::Bounded(t) => {
            let v = t - score;
            let tail = (u - v).exp_m1().recip();
            (safe_logistic(-u) + tail, -safe_logistic(v) - tail)
        }
    }
}

/// `ln(1 + e^x)` without overflow.
fn softplus(x: f64) -> f64 {
    if x > 0.0 { x + (-x).exp().ln_1p() } else { x.exp().ln_1p() }
}
