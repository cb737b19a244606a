//! Threshold-ordering constraints and their Jacobian.
//!
//! The inequality constraints are the consecutive differences of the
//! threshold block, `c_k = θ[k+1] − θ[k] ≥ 0` for `k = 0..K−1`. Their
//! Jacobian with respect to `[w; θ]` is constant: zero over the weight
//! columns and a bidiagonal difference operator over the threshold columns
//! (`−1` on the diagonal, `+1` on the superdiagonal).
//!
//! The solver enforces ordering by construction (see
//! [`transform`](crate::ordinal::core::transform)); these functions are used
//! to audit fitted parameters and are part of the public model surface.
use crate::ordinal::{core::params::ParamLayout, errors::OrdinalResult};
use ndarray::{Array1, Array2, ArrayView1};

/// Consecutive threshold differences `θ[k+1] − θ[k]`, length `K − 1`.
///
/// # Errors
/// Parameter layout errors from [`ParamLayout::validate`].
pub fn threshold_constraints(params: ArrayView1<f64>, layout: ParamLayout) -> OrdinalResult<Array1<f64>> {
    layout.validate(params)?;
    let th = layout.thresholds(params);
    Ok(th.windows(2).into_iter().map(|pair| pair[1] - pair[0]).collect())
}

/// Constant `(K − 1) × (D + K)` Jacobian of [`threshold_constraints`].
pub fn constraint_jacobian(layout: ParamLayout) -> Array2<f64> {
    let rows = layout.n_classes.saturating_sub(1);
    let mut jac = Array2::<f64>::zeros((rows, layout.len()));
    for k in 0..rows {
        jac[[k, layout.n_features + k]] = -1.0;
        jac[[k, layout.n_features + k + 1]] = 1.0;
    }
    jac
}

/// `true` when every threshold difference is at least `-tol`.
pub fn is_ordered(constraints: ArrayView1<f64>, tol: f64) -> bool {
    constraints.iter().all(|&c| c >= -tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Values of the ordering constraints.
    // - The Jacobian's structure and its agreement with finite differences
    //   of the constraints at unrelated parameter vectors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Constraints are the consecutive threshold gaps; weights are ignored.
    fn constraints_are_threshold_gaps() {
        let layout = ParamLayout::new(2, 4);
        let c = threshold_constraints(array![9.0, -9.0, -1.0, -0.5, 0.5, 0.25].view(), layout)
            .expect("valid layout");
        assert_eq!(c, array![0.5, 1.0, -0.25]);
        assert!(!is_ordered(c.view(), 1e-12));
        assert!(is_ordered(array![0.0, 1e-13, -1e-13].view(), 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // The Jacobian is constant and reproduces the finite-difference Jacobian
    // of the constraints at any parameter vector.
    //
    // Given
    // -----
    // - D = 2, K = 4 and two very different parameter vectors.
    //
    // Expect
    // ------
    // - Zero weight columns, −1/+1 bidiagonal threshold block.
    // - Exact match with forward differences (constraints are linear).
    fn jacobian_matches_finite_differences_everywhere() {
        let layout = ParamLayout::new(2, 4);
        let jac = constraint_jacobian(layout);
        assert_eq!(jac.dim(), (3, 6));
        assert_eq!(
            jac,
            array![
                [0.0, 0.0, -1.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, -1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 0.0, -1.0, 1.0],
            ]
        );

        for params in [array![0.0, 0.0, -1.0, -0.5, 0.0, 1.0], array![3.0, -7.0, 0.25, 0.5, 0.75, 0.9]] {
            let base = threshold_constraints(params.view(), layout).expect("valid");
            let h = 0.5;
            for j in 0..layout.len() {
                let mut bumped = params.clone();
                bumped[j] += h;
                let moved = threshold_constraints(bumped.view(), layout).expect("valid");
                let column = (&moved - &base) / h;
                assert_eq!(column, jac.column(j));
            }
        }
    }
}
