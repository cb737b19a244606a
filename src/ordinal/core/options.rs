//! Ordinal options — configuration for fitting the ordinal logistic model.
//!
//! Purpose
//! -------
//! Collect every knob of a fit in one validated value: optimizer settings,
//! the box bounds on weights and thresholds, the gradient-check tolerance,
//! and how an unconverged solver run is treated.
//!
//! Invariants & assumptions
//! ------------------------
//! - `weight_bound` is finite and strictly positive; it is the only source of
//!   the weight box `[-weight_bound, weight_bound]` (no global constant).
//! - `threshold_range = (lo, hi)` is finite with `lo < hi`.
//! - `grad_check_tol` is finite and strictly positive.
//! - `mle_opts` was built through `MLEOptions::new`/`Tolerances::new` and is
//!   not re-validated here.
//!
//! Conventions
//! -----------
//! - Defaults reproduce the classic configuration: weights bounded by `1e10`,
//!   thresholds in `[-1, 1]`, gradient-check tolerance `1.0`, 5000 L-BFGS
//!   iterations with More–Thuente line search.
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    ordinal::errors::{OrdinalError, OrdinalResult},
};

/// Default weight box half-width.
pub const DEFAULT_WEIGHT_BOUND: f64 = 1e10;
/// Default threshold range.
pub const DEFAULT_THRESHOLD_RANGE: (f64, f64) = (-1.0, 1.0);
/// Default bound on `‖∇_analytic − ∇_fd‖₂` at the starting point.
pub const DEFAULT_GRAD_CHECK_TOL: f64 = 1.0;
/// Default iteration cap of the solver.
pub const DEFAULT_MAX_ITER: usize = 5000;

/// What to do when the solver stops without meeting its convergence
/// criteria (e.g. the iteration cap was hit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Keep the best iterate, emit a `tracing` warning, and record the status
    /// in the fit result.
    #[default]
    Warn,
    /// Fail the fit with [`OrdinalError::NotConverged`].
    Error,
}

/// OrdinalOptions — fit-time configuration for [`OrdinalLogitModel`].
///
/// Fields
/// ------
/// - `mle_opts`: L-BFGS configuration (tolerances, iteration cap, line search).
/// - `weight_bound`: half-width of the box on every weight.
/// - `threshold_range`: `(lo, hi)` box for thresholds; also the span of the
///   evenly spaced starting thresholds.
/// - `grad_check_tol`: the fit aborts when the analytic gradient is further
///   than this (L2) from a finite-difference gradient at the start point.
/// - `convergence`: treatment of unconverged runs.
///
/// [`OrdinalLogitModel`]: crate::ordinal::models::OrdinalLogitModel
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalOptions {
    pub mle_opts: MLEOptions,
    pub weight_bound: f64,
    pub threshold_range: (f64, f64),
    pub grad_check_tol: f64,
    pub convergence: ConvergencePolicy,
}

impl OrdinalOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`OrdinalError::InvalidWeightBound`] if `weight_bound` is not finite
    ///   and positive.
    /// - [`OrdinalError::InvalidThresholdRange`] unless `lo < hi`, both finite.
    /// - [`OrdinalError::InvalidGradCheckTol`] if `grad_check_tol` is not
    ///   finite and positive.
    pub fn new(
        mle_opts: MLEOptions, weight_bound: f64, threshold_range: (f64, f64), grad_check_tol: f64,
        convergence: ConvergencePolicy,
    ) -> OrdinalResult<Self> {
        if !weight_bound.is_finite() || weight_bound <= 0.0 {
            return Err(OrdinalError::InvalidWeightBound { value: weight_bound });
        }
        let (lower, upper) = threshold_range;
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(OrdinalError::InvalidThresholdRange { lower, upper });
        }
        if !grad_check_tol.is_finite() || grad_check_tol <= 0.0 {
            return Err(OrdinalError::InvalidGradCheckTol { value: grad_check_tol });
        }
        Ok(Self { mle_opts, weight_bound, threshold_range, grad_check_tol, convergence })
    }

    /// Default options with a different solver configuration.
    pub fn with_mle_opts(mle_opts: MLEOptions) -> Self {
        Self { mle_opts, ..Self::default() }
    }
}

impl Default for OrdinalOptions {
    fn default() -> Self {
        let tols = Tolerances {
            tol_grad: Some(1e-6),
            tol_cost: Some(1e-12),
            max_iter: Some(DEFAULT_MAX_ITER),
        };
        Self {
            mle_opts: MLEOptions {
                tols,
                line_searcher: LineSearcher::MoreThuente,
                verbose: false,
                lbfgs_mem: None,
            },
            weight_bound: DEFAULT_WEIGHT_BOUND,
            threshold_range: DEFAULT_THRESHOLD_RANGE,
            grad_check_tol: DEFAULT_GRAD_CHECK_TOL,
            convergence: ConvergencePolicy::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Defaults match the documented configuration.
    fn defaults_are_documented_values() {
        let opts = OrdinalOptions::default();
        assert_eq!(opts.weight_bound, 1e10);
        assert_eq!(opts.threshold_range, (-1.0, 1.0));
        assert_eq!(opts.grad_check_tol, 1.0);
        assert_eq!(opts.mle_opts.tols.max_iter, Some(5000));
        assert_eq!(opts.mle_opts.line_searcher, LineSearcher::MoreThuente);
        assert_eq!(opts.convergence, ConvergencePolicy::Warn);
    }

    #[test]
    // Purpose
    // -------
    // Each numeric knob is validated independently.
    //
    // Expect
    // ------
    // - Zero/NaN bounds, an inverted range and a non-positive tolerance are
    //   rejected with their own error variant.
    fn constructor_rejects_invalid_values() {
        let mle = MLEOptions::default();
        let p = ConvergencePolicy::Error;
        assert!(matches!(
            OrdinalOptions::new(mle.clone(), 0.0, (-1.0, 1.0), 1.0, p),
            Err(OrdinalError::InvalidWeightBound { .. })
        ));
        assert!(matches!(
            OrdinalOptions::new(mle.clone(), f64::NAN, (-1.0, 1.0), 1.0, p),
            Err(OrdinalError::InvalidWeightBound { .. })
        ));
        assert!(matches!(
            OrdinalOptions::new(mle.clone(), 10.0, (1.0, -1.0), 1.0, p),
            Err(OrdinalError::InvalidThresholdRange { .. })
        ));
        assert!(matches!(
            OrdinalOptions::new(mle.clone(), 10.0, (-1.0, 1.0), -0.5, p),
            Err(OrdinalError::InvalidGradCheckTol { .. })
        ));
        let ok = OrdinalOptions::new(mle, 10.0, (-2.0, 2.0), 0.5, p).expect("valid options");
        assert_eq!(ok.convergence, ConvergencePolicy::Error);
    }
}
