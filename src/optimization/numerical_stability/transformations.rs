//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear maps used to keep
//! optimizer iterates inside a feasible region. The unconstrained solver
//! works on a free vector `z`; these helpers map `z` into bounded,
//! ordered model parameters and pull gradients back through the maps.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: floor applied to softmax shares before taking logs.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))` for any finite or
//!   infinite `x`.
//! - [`box_tanh`], [`box_tanh_inv`], [`box_tanh_deriv`]: smooth bijection
//!   between ℝ and an open interval `(lo, hi)`, identity near the centre.
//! - [`cumulative_softmax`], [`cumulative_softmax_deriv`],
//!   [`cumulative_softmax_inv`]: map `m + 1` logits to `m` non-decreasing
//!   values inside `(lo, hi)`, with the last softmax share acting as slack.
//!
//! # Rationale
//! Box bounds and ordering constraints are enforced by construction
//! instead of by projection, so a quasi-Newton solver never sees an
//! infeasible point.
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Smallest softmax share allowed when inverting [`cumulative_softmax`].
///
/// Shares at exactly zero would need a logit of `-∞`; flooring keeps every
/// logit finite.
pub const LOGIT_EPS: f64 = 1e-12;

/// Numerically stable logistic sigmoid `σ(x) = 1 / (1 + exp(-x))`.
///
/// Branches on the sign of `x` so that `exp` is only ever evaluated on a
/// non-positive argument:
///
/// - `x ≥ 0`: `1 / (1 + exp(-x))`
/// - `x < 0`: `exp(x) / (1 + exp(x))`
///
/// Saturates to exactly `0.0` at `-∞` and `1.0` at `+∞`; `NaN` in gives
/// `NaN` out.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Map a free coordinate `z` into the open box `(lo, hi)`.
///
/// Uses `c + h·tanh((z − c)/h)` with `c = (lo + hi)/2`, `h = (hi − lo)/2`,
/// which is the identity to first order around the centre. Infinite bounds
/// degrade to the identity map.
pub fn box_tanh(z: f64, lo: f64, hi: f64) -> f64 {
    if !lo.is_finite() || !hi.is_finite() {
        return z;
    }
    let c = 0.5 * (lo + hi);
    let h = 0.5 * (hi - lo);
    c + h * ((z - c) / h).tanh()
}

/// Inverse of [`box_tanh`].
///
/// `w` must lie strictly inside `(lo, hi)`; boundary values map to `±∞`
/// and callers are expected to reject those beforehand.
pub fn box_tanh_inv(w: f64, lo: f64, hi: f64) -> f64 {
    if !lo.is_finite() || !hi.is_finite() {
        return w;
    }
    let c = 0.5 * (lo + hi);
    let h = 0.5 * (hi - lo);
    c + h * ((w - c) / h).atanh()
}

/// Derivative `d box_tanh(z) / dz = 1 − tanh²((z − c)/h)`.
pub fn box_tanh_deriv(z: f64, lo: f64, hi: f64) -> f64 {
    if !lo.is_finite() || !hi.is_finite() {
        return 1.0;
    }
    let c = 0.5 * (lo + hi);
    let h = 0.5 * (hi - lo);
    let t = ((z - c) / h).tanh();
    1.0 - t * t
}

/// Cumulative softmax: `m + 1` logits to `m` ordered values in `(lo, hi)`.
///
/// Writes the max-shifted softmax of `logits` into `shares` (length
/// `m + 1`) and then
///
/// ```text
/// out[k] = lo + (hi − lo) · Σ_{j ≤ k} shares[j],   k = 0..m
/// ```
///
/// into `out` (length `m`). The trailing share is never accumulated and
/// plays the role of slack below `hi`.
///
/// `shares` must have the length of `logits` and `out` one less; both are
/// sized by the caller from the same parameter layout (checked in debug
/// builds only).
pub fn cumulative_softmax(
    logits: ArrayView1<f64>, lo: f64, hi: f64, mut shares: ArrayViewMut1<f64>,
    mut out: ArrayViewMut1<f64>,
) {
    debug_assert_eq!(shares.len(), logits.len());
    debug_assert_eq!(out.len() + 1, logits.len());

    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.0;
    for (s, &u) in shares.iter_mut().zip(logits.iter()) {
        *s = (u - max).exp();
        total += *s;
    }
    shares.mapv_inplace(|s| s / total);

    let width = hi - lo;
    let mut acc = 0.0;
    for (o, &s) in out.iter_mut().zip(shares.iter()) {
        acc += s;
        *o = lo + width * acc;
    }
}

/// Pull a gradient back through [`cumulative_softmax`].
///
/// Given `g[k] = ∂f/∂out[k]` and the `shares` produced by the forward map,
/// writes `∂f/∂logits[m]` into `grad_logits`:
///
/// ```text
/// c_j = (hi − lo) · Σ_{k ≥ j} g[k]   (c_m = 0 for the slack share)
/// ∂f/∂u_m = p_m · (c_m − Σ_j p_j c_j)
/// ```
///
/// Runs in `O(m)` using a suffix sum.
pub fn cumulative_softmax_deriv(
    shares: ArrayView1<f64>, lo: f64, hi: f64, g: ArrayView1<f64>,
    mut grad_logits: ArrayViewMut1<f64>,
) {
    debug_assert_eq!(shares.len(), grad_logits.len());
    debug_assert_eq!(g.len() + 1, shares.len());

    let width = hi - lo;
    let m = g.len();

    // Suffix sums land in grad_logits first, then get overwritten.
    let mut suffix = 0.0;
    grad_logits[m] = 0.0;
    for j in (0..m).rev() {
        suffix += g[j];
        grad_logits[j] = width * suffix;
    }
    let mean_c: f64 = shares.iter().zip(grad_logits.iter()).map(|(&p, &c)| p * c).sum();
    for (gl, &p) in grad_logits.iter_mut().zip(shares.iter()) {
        *gl = p * (*gl - mean_c);
    }
}

/// Logits that reproduce `values` under [`cumulative_softmax`].
///
/// Shares are the normalised gaps `values[0] − lo`, consecutive
/// differences, and `hi − values[m − 1]`. Each share is floored at
/// `max(floor, LOGIT_EPS)` and the vector renormalised, so points on (or
/// outside) the boundary are pulled strictly inside before the log.
///
/// `values` is assumed non-decreasing; decreasing pairs are treated as a
/// zero gap and floored like any other boundary share.
pub fn cumulative_softmax_inv(values: ArrayView1<f64>, lo: f64, hi: f64, floor: f64) -> Array1<f64> {
    let m = values.len();
    let width = hi - lo;
    let floor = floor.max(LOGIT_EPS);

    let mut shares = Array1::<f64>::zeros(m + 1);
    let mut prev = lo;
    for (k, &v) in values.iter().enumerate() {
        shares[k] = ((v - prev) / width).max(floor);
        prev = v;
    }
    shares[m] = ((hi - prev) / width).max(floor);

    let total = shares.sum();
    shares.mapv(|s| (s / total).ln())
}
