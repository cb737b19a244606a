//! Negative log-likelihood of the ordinal logistic model and its gradient.
//!
//! All functions work on the natural parameter vector `[w; θ]` described by
//! [`ParamLayout`] and accumulate sample by sample in explicit loops.
//!
//! Objective
//! ---------
//! `NLL(w, θ) = −Σ_i ln(P_upper[i] − P_lower[i])` with
//! `P_upper[i] = σ(θ[r_i] − s_i)`, `P_lower[i] = σ(θ[r_i − 1] − s_i)`,
//! `s_i = x_i·w` and an open lower bound for the lowest class. A bin mass
//! that evaluates to zero (collapsed thresholds, or both sigmoids rounding
//! to 1) gives `+∞`; crossed thresholds give `NaN`.
//!
//! Gradient
//! --------
//! With `a = P_upper`, `b = P_lower`, `q = a − b` (replaced by
//! [`DIFF_FLOOR`] when it is exactly zero):
//!
//! ```text
//! ∂NLL/∂w      =  Σ_i x_i · (a(1−a) − b(1−b)) / q
//! ∂NLL/∂θ[r]   = −Σ_{i: r_i = r}     a(1−a) / q
//!              + Σ_{i: r_i = r + 1}  b(1−b) / q
//! ```
//!
//! Log-space pair
//! --------------
//! [`log_space_nll`] and [`log_space_gradient`] evaluate the same objective
//! through [`log_bin_mass`] and its exact partials. They agree with the pair
//! above wherever `a − b` is representable and stay finite and mutually
//! consistent where it rounds to zero. The solver minimizes this pair; the
//! gradient audit and reported objectives use the pair above.
use crate::ordinal::{
    core::{
        links::{log_bin_mass, log_bin_mass_partials, lower_bound},
        params::ParamLayout,
    },
    errors::{OrdinalError, OrdinalResult},
};
use crate::optimization::numerical_stability::transformations::safe_logistic;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Substitute for a bin mass that evaluates to exactly zero in the gradient.
pub const DIFF_FLOOR: f64 = 1e-32;

/// Negative log-likelihood `−Σ ln(P_upper − P_lower)` at `params`.
///
/// # Errors
/// Layout and shape errors only (see [`check_inputs`]); numerical
/// degeneracy shows up as a non-finite return value.
pub fn negative_log_likelihood(
    params: ArrayView1<f64>, x: ArrayView2<f64>, ranks: &[usize], layout: ParamLayout,
) -> OrdinalResult<f64> {
    check_inputs(params, x, ranks, layout)?;
    let w = layout.weights(params);
    let th = layout.thresholds(params);

    let mut nll = 0.0;
    for (row, &r) in x.rows().into_iter().zip(ranks) {
        let s = row.dot(&w);
        let a = safe_logistic(th[r] - s);
        let b = lower_bound(th, r).cdf(s);
        nll -= (a - b).ln();
    }
    Ok(nll)
}

/// Analytic gradient of [`negative_log_likelihood`] at `params`.
///
/// # Errors
/// Layout and shape errors only (see [`check_inputs`]).
pub fn nll_gradient(
    params: ArrayView1<f64>, x: ArrayView2<f64>, ranks: &[usize], layout: ParamLayout,
) -> OrdinalResult<Array1<f64>> {
    check_inputs(params, x, ranks, layout)?;
    let w = layout.weights(params);
    let th = layout.thresholds(params);

    let mut grad_w = Array1::<f64>::zeros(layout.n_features);
    let mut grad_th = Array1::<f64>::zeros(layout.n_classes);
    for (row, &r) in x.rows().into_iter().zip(ranks) {
        let s = row.dot(&w);
        let a = safe_logistic(th[r] - s);
        let b = lower_bound(th, r).cdf(s);
        let mut q = a - b;
        if q == 0.0 {
            q = DIFF_FLOOR;
        }
        let da = a * (1.0 - a);
        let db = b * (1.0 - b);

        grad_w.scaled_add((da - db) / q, &row);
        grad_th[r] += da / q;
        if r > 0 {
            grad_th[r - 1] -= db / q;
        }
    }
    grad_th.mapv_inplace(|g| -g);
    Ok(layout.join(grad_w.view(), grad_th.view()))
}

/// [`negative_log_likelihood`] evaluated in log space.
///
/// # Errors
/// Layout and shape errors only (see [`check_inputs`]).
pub fn log_space_nll(
    params: ArrayView1<f64>, x: ArrayView2<f64>, ranks: &[usize], layout: ParamLayout,
) -> OrdinalResult<f64> {
    check_inputs(params, x, ranks, layout)?;
    let w = layout.weights(params);
    let th = layout.thresholds(params);

    let mut nll = 0.0;
    for (row, &r) in x.rows().into_iter().zip(ranks) {
        nll -= log_bin_mass(th[r], lower_bound(th, r), row.dot(&w));
    }
    Ok(nll)
}

/// Exact gradient of [`log_space_nll`].
///
/// # Errors
/// Layout and shape errors only (see [`check_inputs`]).
pub fn log_space_gradient(
    params: ArrayView1<f64>, x: ArrayView2<f64>, ranks: &[usize], layout: ParamLayout,
) -> OrdinalResult<Array1<f64>> {
    check_inputs(params, x, ranks, layout)?;
    let w = layout.weights(params);
    let th = layout.thresholds(params);

    let mut grad_w = Array1::<f64>::zeros(layout.n_features);
    let mut grad_th = Array1::<f64>::zeros(layout.n_classes);
    for (row, &r) in x.rows().into_iter().zip(ranks) {
        let (du, dv) = log_bin_mass_partials(th[r], lower_bound(th, r), row.dot(&w));
        grad_w.scaled_add(du + dv, &row);
        grad_th[r] -= du;
        if r > 0 {
            grad_th[r - 1] -= dv;
        }
    }
    Ok(layout.join(grad_w.view(), grad_th.view()))
}

/// Shared shape checks for objective and gradient.
///
/// # Errors
/// - [`OrdinalError::ParamLengthMismatch`] / [`OrdinalError::NonFiniteParam`]
/// - [`OrdinalError::FeatureCountMismatch`] when `x` has the wrong width.
/// - [`OrdinalError::ShapeMismatch`] when rows and ranks disagree.
/// - [`OrdinalError::RankOutOfRange`] for a rank `≥ n_classes`.
pub fn check_inputs(
    params: ArrayView1<f64>, x: ArrayView2<f64>, ranks: &[usize], layout: ParamLayout,
) -> OrdinalResult<()> {
    layout.validate(params)?;
    if x.ncols() != layout.n_features {
        return Err(OrdinalError::FeatureCountMismatch {
            expected: layout.n_features,
            actual: x.ncols(),
        });
    }
    if x.nrows() != ranks.len() {
        return Err(OrdinalError::ShapeMismatch { rows: x.nrows(), labels: ranks.len() });
    }
    if let Some((index, &rank)) = ranks.iter().enumerate().find(|&(_, &r)| r >= layout.n_classes) {
        return Err(OrdinalError::RankOutOfRange { index, rank, n_classes: layout.n_classes });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordinal::core::links::{p_lower, p_upper};
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Finiteness and positivity of bin masses for ordered thresholds.
    // - Agreement of the analytic gradient with central finite differences
    //   at several ordered parameter vectors.
    // - The zero-mass floor in the gradient and shape validation.
    // - The log-space pair: agreement with the quotient pair in the safe
    //   range, and self-consistency where both sigmoids round to 1.
    // -------------------------------------------------------------------------

    fn toy() -> (Array2<f64>, Vec<usize>, ParamLayout) {
        let x = array![
            [-1.2, 0.3],
            [-0.8, -0.5],
            [0.1, 0.9],
            [0.3, -0.2],
            [0.2, 0.4],
            [1.1, -0.7],
            [1.5, 0.6],
        ];
        (x, vec![0, 0, 1, 1, 1, 2, 2], ParamLayout::new(2, 3))
    }

    fn central_diff(params: &Array1<f64>, x: &Array2<f64>, ranks: &[usize], layout: ParamLayout) -> Array1<f64> {
        let h = 1e-6;
        Array1::from_shape_fn(params.len(), |j| {
            let mut up = params.clone();
            let mut dn = params.clone();
            up[j] += h;
            dn[j] -= h;
            let fu = negative_log_likelihood(up.view(), x.view(), ranks, layout).expect("valid");
            let fd = negative_log_likelihood(dn.view(), x.view(), ranks, layout).expect("valid");
            (fu - fd) / (2.0 * h)
        })
    }

    #[test]
    // Purpose
    // -------
    // With strictly increasing thresholds every bin has positive mass and
    // the objective is finite and equals −Σ ln(P_upper − P_lower).
    fn objective_is_finite_for_ordered_thresholds() {
        let (x, ranks, layout) = toy();
        let params = array![0.7, -0.4, -0.6, 0.1, 0.8];

        let nll = negative_log_likelihood(params.view(), x.view(), &ranks, layout).expect("valid");
        let w = layout.weights(params.view());
        let th = layout.thresholds(params.view());
        let a = p_upper(x.view(), th, w, &ranks);
        let b = p_lower(x.view(), th, w, &ranks);

        assert!(nll.is_finite());
        assert!(a.iter().zip(b.iter()).all(|(&ai, &bi)| ai - bi > 0.0));
        let naive: f64 = -a.iter().zip(b.iter()).map(|(&ai, &bi)| (ai - bi).ln()).sum::<f64>();
        assert_relative_eq!(nll, naive, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient matches central differences of the objective.
    //
    // Given
    // -----
    // - Three ordered parameter vectors, including the default start point.
    //
    // Expect
    // ------
    // - Componentwise agreement within 1e-5.
    fn gradient_matches_central_differences() {
        let (x, ranks, layout) = toy();
        for params in [
            array![1.0, 1.0, -1.0, 0.0, 1.0],
            array![0.7, -0.4, -0.6, 0.1, 0.8],
            array![-2.0, 0.5, -0.9, -0.85, 0.3],
        ] {
            let analytic = nll_gradient(params.view(), x.view(), &ranks, layout).expect("valid");
            let numeric = central_diff(&params, &x, &ranks, layout);
            for (g, n) in analytic.iter().zip(numeric.iter()) {
                assert_relative_eq!(*g, *n, epsilon = 1e-5);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Collapsed thresholds make the objective non-finite while the gradient
    // stays finite thanks to the zero-mass floor.
    fn collapsed_bin_is_non_finite_in_objective_but_floored_in_gradient() {
        let x = array![[0.0], [0.0]];
        let ranks = [0, 1];
        let layout = ParamLayout::new(1, 2);
        let params = array![1.0, 0.5, 0.5];

        let nll = negative_log_likelihood(params.view(), x.view(), &ranks, layout).expect("valid");
        let grad = nll_gradient(params.view(), x.view(), &ranks, layout).expect("valid");

        assert!(!nll.is_finite());
        assert!(grad.iter().all(|g| g.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Shape problems are reported before any arithmetic.
    fn inputs_are_validated() {
        let (x, ranks, layout) = toy();
        let short = array![1.0, 1.0, 0.0];
        assert!(matches!(
            negative_log_likelihood(short.view(), x.view(), &ranks, layout),
            Err(OrdinalError::ParamLengthMismatch { expected: 5, actual: 3 })
        ));
        let params = layout.initial_guess(-1.0, 1.0);
        assert!(matches!(
            nll_gradient(params.view(), x.view(), &ranks[..3], layout),
            Err(OrdinalError::ShapeMismatch { rows: 7, labels: 3 })
        ));
        let bad_ranks = [0, 0, 1, 1, 1, 2, 3];
        assert!(matches!(
            nll_gradient(params.view(), x.view(), &bad_ranks, layout),
            Err(OrdinalError::RankOutOfRange { index: 6, rank: 3, .. })
        ));
    }

    /// One sample in class 1 with score +60 below both of its boundaries:
    /// `σ(1.0 + 60)` and `σ(0.5 + 60)` both round to 1.
    fn saturated() -> (Array2<f64>, Vec<usize>, ParamLayout, Array1<f64>) {
        (array![[1.0]], vec![1], ParamLayout::new(1, 3), array![-60.0, 0.5, 1.0, 1.0])
    }

    #[test]
    // Purpose
    // -------
    // A bin mass that rounds to zero makes the objective `+∞`.
    //
    // Given
    // -----
    // - The saturated single-sample problem.
    //
    // Expect
    // ------
    // - `P_upper − P_lower == 0` and `negative_log_likelihood == +∞`.
    fn objective_is_infinite_when_bin_mass_rounds_to_zero() {
        let (x, ranks, layout, params) = saturated();
        let w = layout.weights(params.view());
        let th = layout.thresholds(params.view());
        let a = p_upper(x.view(), th, w, &ranks);
        let b = p_lower(x.view(), th, w, &ranks);
        assert_eq!(a[0] - b[0], 0.0);

        let nll = negative_log_likelihood(params.view(), x.view(), &ranks, layout).expect("valid");
        assert_eq!(nll, f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // The log-space pair matches the quotient pair where bin masses are
    // representable.
    fn log_space_pair_matches_quotient_pair() {
        let (x, ranks, layout) = toy();
        for params in [array![1.0, 1.0, -1.0, 0.0, 1.0], array![0.7, -0.4, -0.6, 0.1, 0.8]] {
            let direct = negative_log_likelihood(params.view(), x.view(), &ranks, layout).expect("valid");
            let logged = log_space_nll(params.view(), x.view(), &ranks, layout).expect("valid");
            assert_relative_eq!(direct, logged, max_relative = 1e-12);

            let g = nll_gradient(params.view(), x.view(), &ranks, layout).expect("valid");
            let lg = log_space_gradient(params.view(), x.view(), &ranks, layout).expect("valid");
            for (a, b) in g.iter().zip(lg.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-10);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Where the direct objective is `+∞`, the log-space objective is finite
    // and its gradient is the slope of that same objective.
    //
    // Given
    // -----
    // - The saturated single-sample problem.
    //
    // Expect
    // ------
    // - `∂/∂w = −1` (the score leaves both boundaries at the same rate),
    //   and every component matches central differences to 1e-6.
    fn log_space_gradient_is_slope_of_log_space_objective_under_saturation() {
        let (x, ranks, layout, params) = saturated();
        let nll = log_space_nll(params.view(), x.view(), &ranks, layout).expect("valid");
        let grad = log_space_gradient(params.view(), x.view(), &ranks, layout).expect("valid");
        assert!(nll.is_finite());
        assert_relative_eq!(grad[0], -1.0, epsilon = 1e-9);

        let h = 1e-5;
        for j in 0..params.len() {
            let mut up = params.clone();
            let mut dn = params.clone();
            up[j] += h;
            dn[j] -= h;
            let fu = log_space_nll(up.view(), x.view(), &ranks, layout).expect("valid");
            let fd = log_space_nll(dn.view(), x.view(), &ranks, layout).expect("valid");
            assert_relative_eq!(grad[j], (fu - fd) / (2.0 * h), epsilon = 1e-6);
        }
    }
}
