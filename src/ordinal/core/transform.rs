//! Feasible reparameterisation of the ordinal parameter vector.
//!
//! Purpose
//! -------
//! Let an unconstrained quasi-Newton solver optimize over the box-bounded,
//! monotone parameter set `{ w ∈ [-big, big]^D, lo ≤ θ_0 ≤ … ≤ θ_{K−1} ≤ hi }`.
//!
//! Solver space
//! ------------
//! `z = [z_w (D); u (K + 1)]`:
//! - `w_j = box_tanh(z_w[j], -big, big)`;
//! - `θ = cumulative_softmax(u, lo, hi)`, whose trailing share is slack
//!   below `hi`.
//!
//! Every `z` maps to a feasible natural vector, so ordering and bounds hold
//! at every solver iterate, line-search trial points included.
use crate::{
    optimization::numerical_stability::transformations::{
        box_tanh, box_tanh_deriv, box_tanh_inv, cumulative_softmax, cumulative_softmax_deriv,
        cumulative_softmax_inv,
    },
    ordinal::{
        core::params::ParamLayout,
        errors::{OrdinalError, OrdinalResult},
    },
};
use ndarray::{Array1, ArrayView1, s};

/// Natural parameters recovered from a solver vector, plus the softmax
/// shares needed to pull gradients back.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalParams {
    pub params: Array1<f64>,
    pub shares: Array1<f64>,
}

/// Bijection between the solver space and the feasible natural space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibleMap {
    pub layout: ParamLayout,
    pub weight_bound: f64,
    pub threshold_range: (f64, f64),
    /// Minimum threshold share used when mapping a natural point inward.
    pub share_floor: f64,
}

impl FeasibleMap {
    pub fn new(layout: ParamLayout, weight_bound: f64, threshold_range: (f64, f64)) -> Self {
        let share_floor = 0.25 / (layout.n_classes + 1) as f64;
        Self { layout, weight_bound, threshold_range, share_floor }
    }

    /// Length of the solver vector, `D + K + 1`.
    pub fn solver_len(&self) -> usize {
        self.layout.len() + 1
    }

    /// Map a solver vector to natural parameters.
    ///
    /// # Errors
    /// [`OrdinalError::ParamLengthMismatch`] when `z` is not `D + K + 1` long,
    /// [`OrdinalError::NonFiniteParam`] for NaN/±inf entries.
    pub fn to_natural(&self, z: ArrayView1<f64>) -> OrdinalResult<NaturalParams> {
        self.check_solver(z)?;
        let d = self.layout.n_features;
        let (lo, hi) = self.threshold_range;
        let big = self.weight_bound;

        let mut params = Array1::<f64>::zeros(self.layout.len());
        let mut shares = Array1::<f64>::zeros(self.layout.n_classes + 1);
        for j in 0..d {
            params[j] = box_tanh(z[j], -big, big);
        }
        cumulative_softmax(
            z.slice(s![d..]),
            lo,
            hi,
            shares.view_mut(),
            params.slice_mut(s![d..]),
        );
        Ok(NaturalParams { params, shares })
    }

    /// Map natural parameters into the solver space.
    ///
    /// Thresholds on (or beyond) the range ends are pulled inside by
    /// flooring every share at [`FeasibleMap::share_floor`].
    ///
    /// # Errors
    /// - Layout errors from [`ParamLayout::validate`].
    /// - [`OrdinalError::StartOutsideBounds`] for a weight not strictly
    ///   inside `(-big, big)`.
    pub fn to_solver(&self, params: ArrayView1<f64>) -> OrdinalResult<Array1<f64>> {
        self.layout.validate(params)?;
        let (lo, hi) = self.threshold_range;
        let big = self.weight_bound;

        let mut z = Array1::<f64>::zeros(self.solver_len());
        for (j, &w) in self.layout.weights(params).iter().enumerate() {
            let zj = box_tanh_inv(w, -big, big);
            if !zj.is_finite() {
                return Err(OrdinalError::StartOutsideBounds {
                    index: j,
                    value: w,
                    lower: -big,
                    upper: big,
                });
            }
            z[j] = zj;
        }
        let logits = cumulative_softmax_inv(self.layout.thresholds(params), lo, hi, self.share_floor);
        z.slice_mut(s![self.layout.n_features..]).assign(&logits);
        Ok(z)
    }

    /// Chain rule: turn `∂f/∂[w; θ]` into `∂f/∂z`.
    ///
    /// `shares` must be the ones returned by [`FeasibleMap::to_natural`] for
    /// the same `z`.
    ///
    /// # Errors
    /// Length errors for `z` or `natural_grad`.
    pub fn pull_back(
        &self, z: ArrayView1<f64>, shares: ArrayView1<f64>, natural_grad: ArrayView1<f64>,
    ) -> OrdinalResult<Array1<f64>> {
        self.check_solver(z)?;
        if natural_grad.len() != self.layout.len() {
            return Err(OrdinalError::ParamLengthMismatch {
                expected: self.layout.len(),
                actual: natural_grad.len(),
            });
        }
        let d = self.layout.n_features;
        let (lo, hi) = self.threshold_range;
        let big = self.weight_bound;

        let mut grad = Array1::<f64>::zeros(self.solver_len());
        for j in 0..d {
            grad[j] = natural_grad[j] * box_tanh_deriv(z[j], -big, big);
        }
        cumulative_softmax_deriv(
            shares,
            lo,
            hi,
            self.layout.thresholds(natural_grad),
            grad.slice_mut(s![d..]),
        );
        Ok(grad)
    }

    /// Length and finiteness check of a solver vector.
    ///
    /// # Errors
    /// [`OrdinalError::ParamLengthMismatch`] / [`OrdinalError::NonFiniteParam`].
    pub fn check_solver(&self, z: ArrayView1<f64>) -> OrdinalResult<()> {
        if z.len() != self.solver_len() {
            return Err(OrdinalError::ParamLengthMismatch {
                expected: self.solver_len(),
                actual: z.len(),
            });
        }
        if let Some((index, &value)) = z.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OrdinalError::NonFiniteParam { index, value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Feasibility (bounds and ordering) of every mapped solver vector.
    // - Round trips for interior natural points and inward mapping of the
    //   default starting point.
    // - The pulled-back gradient against finite differences in solver space.
    // -------------------------------------------------------------------------

    fn map() -> FeasibleMap {
        FeasibleMap::new(ParamLayout::new(2, 3), 1e10, (-1.0, 1.0))
    }

    #[test]
    // Purpose
    // -------
    // Arbitrary solver vectors map to ordered thresholds inside the range.
    fn any_solver_vector_is_feasible() {
        let m = map();
        assert_eq!(m.solver_len(), 6);
        for z in [array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0], array![5.0, -3.0, 9.0, -12.0, 0.4, 30.0]] {
            let nat = m.to_natural(z.view()).expect("valid solver vector");
            let th = m.layout.thresholds(nat.params.view());
            assert!(th.iter().all(|&t| (-1.0..=1.0).contains(&t)));
            assert!(th.windows(2).into_iter().all(|p| p[0] <= p[1]));
            assert_relative_eq!(nat.shares.sum(), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // Interior natural points survive a round trip; the default start, which
    // sits on the range ends, is pulled strictly inside while staying ordered.
    //
    // Expect
    // ------
    // - Exact recovery (to 1e-10) of `[0.3, -2, -0.5, 0.1, 0.6]`.
    // - For `[1, 1, -1, 0, 1]`: weights unchanged, middle threshold at 0,
    //   outer thresholds strictly inside (-1, 1).
    fn natural_round_trip_and_inward_start() {
        let m = map();
        let interior = array![0.3, -2.0, -0.5, 0.1, 0.6];
        let z = m.to_solver(interior.view()).expect("interior point");
        let back = m.to_natural(z.view()).expect("valid");
        for (a, b) in back.params.iter().zip(interior.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }

        let start = m.layout.initial_guess(-1.0, 1.0);
        let z0 = m.to_solver(start.view()).expect("default start");
        let nat0 = m.to_natural(z0.view()).expect("valid");
        assert_relative_eq!(nat0.params[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(nat0.params[3], 0.0, epsilon = 1e-12);
        assert!(nat0.params[2] > -1.0 && nat0.params[4] < 1.0);
        assert!(nat0.params[2] < nat0.params[3] && nat0.params[3] < nat0.params[4]);
    }

    #[test]
    // Purpose
    // -------
    // A weight on the box edge cannot be represented in solver space.
    fn weight_on_bound_is_rejected() {
        let m = FeasibleMap::new(ParamLayout::new(1, 2), 2.0, (-1.0, 1.0));
        assert!(matches!(
            m.to_solver(array![2.0, -0.5, 0.5].view()),
            Err(OrdinalError::StartOutsideBounds { index: 0, .. })
        ));
        assert!(matches!(
            m.to_natural(array![0.0, 0.0].view()),
            Err(OrdinalError::ParamLengthMismatch { expected: 4, actual: 2 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `pull_back` is the exact chain rule of `to_natural`.
    //
    // Given
    // -----
    // - `f(z) = g · to_natural(z)` for a fixed natural-space vector `g`,
    //   with a narrow weight box so the tanh curvature matters.
    //
    // Expect
    // ------
    // - Central differences of `f` match `pull_back(z, g)` within 1e-7.
    fn pull_back_matches_finite_differences() {
        let m = FeasibleMap::new(ParamLayout::new(2, 3), 3.0, (-1.0, 1.0));
        let g = array![0.7, -1.3, 2.0, -0.5, 1.1];
        let z = array![1.2, -0.8, 0.3, -0.4, 0.9, 0.1];
        let f = |z: &Array1<f64>| m.to_natural(z.view()).expect("valid").params.dot(&g);

        let nat = m.to_natural(z.view()).expect("valid");
        let analytic = m.pull_back(z.view(), nat.shares.view(), g.view()).expect("valid");

        let h = 1e-6;
        for j in 0..z.len() {
            let mut up = z.clone();
            let mut dn = z.clone();
            up[j] += h;
            dn[j] -= h;
            assert_relative_eq!(analytic[j], (f(&up) - f(&dn)) / (2.0 * h), epsilon = 1e-7);
        }
    }
}
