//! loglik_optimizer::finite_diff — finite-difference gradient helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient approximations around a parameter
//! vector, together with validation and error capture, so that the rest of
//! the optimizer can request derivatives (or audit analytic ones) without
//! depending directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and post-hoc
//!   validation via [`run_fd_diff`].
//! - Measure how far an analytic gradient sits from a forward-difference
//!   approximation via [`gradient_discrepancy`]; models use this as a
//!   pre-flight check before handing their gradient to the solver.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during finite differencing is routed
//!   into a shared `closure_err` cell and treated as a hard failure.
//! - Gradients returned from this module satisfy [`validate_grad`].
//!
//! Conventions
//! -----------
//! - Forward differences use `finitediff`'s default step
//!   (`sqrt(f64::EPSILON)`), which matches the classic `check_grad`
//!   behavior of scientific Python stacks.
//! - Domain errors are surfaced as [`OptError`](crate::optimization::errors::OptError)
//!   via `OptResult<T>`; Argmin’s [`Error`] is confined to the closure
//!   boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the success path, closure-error propagation and
//!   non-finite rejection of [`run_fd_diff`], plus exact and perturbed
//!   gradients for [`gradient_discrepancy`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, Theta, validation::validate_grad},
};
use argmin::core::Error;
use argmin_math::ArgminL2Norm;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Parameters
/// ----------
/// - `theta`: point at which the gradient is approximated. Its length
///   defines the expected gradient dimension.
/// - `func`: scalar objective. It is expected to write any evaluation error
///   into `closure_err` and return `NaN` in that case.
/// - `closure_err`: shared cell cleared on entry and inspected after the
///   finite-difference sweep.
///
/// Errors
/// ------
/// - Any error captured in `closure_err` (converted via `From<Error>`).
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// gradient_discrepancy — L2 distance between an analytic gradient and a
/// forward-difference approximation of `value` at `theta`.
///
/// Parameters
/// ----------
/// - `theta`: evaluation point.
/// - `value`: fallible scalar objective whose gradient `analytic` claims
///   to be.
/// - `analytic`: candidate gradient at `theta`.
///
/// Returns
/// -------
/// `‖analytic − ∇̂value(θ)‖₂`, where `∇̂` is the forward-difference
/// approximation.
///
/// Errors
/// ------
/// - The first error returned by `value` during the sweep.
/// - Validation errors if either gradient has the wrong length or contains
///   non-finite entries.
pub fn gradient_discrepancy<V>(theta: &Theta, value: V, analytic: &Grad) -> OptResult<f64>
where
    V: Fn(&Theta) -> OptResult<f64>,
{
    validate_grad(analytic, theta.len())?;
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let func = |t: &Theta| -> f64 {
        match value(t) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e.into());
                }
                f64::NAN
            }
        }
    };
    let approx = run_fd_diff(theta, &func, &closure_err)?;
    Ok((analytic - &approx).l2_norm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use argmin::core::ArgminError;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Forward-difference gradient computation with and without closure errors.
    // - Validation failures for non-finite gradients.
    // - Discrepancy measurement between analytic and numerical gradients.
    //
    // They intentionally DO NOT cover:
    // - End-to-end optimizer behavior (handled in higher-level tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `run_fd_diff` returns a valid gradient for a simple quadratic
    // objective with no internal error path.
    //
    // Given
    // -----
    // - `theta = (0, 1)` and `f(θ) = θᵀθ`.
    //
    // Expect
    // ------
    // - A finite gradient of matching length, close to `2θ`.
    fn run_fd_diff_quadratic_returns_valid_gradient() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| x.dot(x);

        // Act
        let grad = run_fd_diff(&theta, &f, &closure_err)
            .expect("Gradient for quadratic should be computed successfully");

        // Assert
        assert_eq!(grad.len(), theta.len());
        assert!((grad[0] - 0.0).abs() < 1e-6);
        assert!((grad[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `run_fd_diff` propagates an error captured in `closure_err`
    // as an `OptError` via the `From<Error>` implementation.
    fn run_fd_diff_closure_error_is_propagated() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            let argmin_err = ArgminError::NotImplemented { text: "fd test".to_string() };
            closure_err.replace(Some(argmin_err.into()));
            f64::NAN
        };

        // Act
        let err = run_fd_diff(&theta, &f, &closure_err)
            .expect_err("Error in closure should cause run_fd_diff to fail");

        // Assert
        assert_eq!(err, OptError::NotImplemented { text: "fd test".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // An objective that is NaN everywhere yields `InvalidGradient`.
    fn run_fd_diff_non_finite_gradient_yields_invalidgradient_error() {
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| f64::NAN;

        let err = run_fd_diff(&theta, &f, &closure_err)
            .expect_err("Non-finite gradient should cause an error");
        assert!(matches!(err, OptError::InvalidGradient { .. }));
    }

    #[test]
    // Purpose
    // -------
    // The exact gradient of a smooth function has a tiny discrepancy; a
    // gradient with a flipped sign has a discrepancy of order its norm.
    //
    // Given
    // -----
    // - `f(θ) = sin(θ₀) + θ₀θ₁²` at `θ = (0.3, -1.2)`.
    //
    // Expect
    // ------
    // - Exact gradient: discrepancy < 1e-5.
    // - Negated gradient: discrepancy ≈ 2‖∇f‖.
    fn gradient_discrepancy_separates_exact_from_wrong_gradient() {
        // Arrange
        let theta = array![0.3_f64, -1.2];
        let f = |t: &Theta| -> OptResult<f64> { Ok(t[0].sin() + t[0] * t[1] * t[1]) };
        let exact = array![theta[0].cos() + theta[1] * theta[1], 2.0 * theta[0] * theta[1]];

        // Act
        let good = gradient_discrepancy(&theta, f, &exact).expect("check should run");
        let bad = gradient_discrepancy(&theta, f, &(-&exact)).expect("check should run");

        // Assert
        assert!(good < 1e-5, "exact gradient discrepancy too large: {good}");
        let norm = exact.dot(&exact).sqrt();
        assert!((bad - 2.0 * norm).abs() < 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Errors from the objective surface unchanged, and a mis-sized analytic
    // gradient is rejected before any evaluation.
    fn gradient_discrepancy_propagates_objective_and_shape_errors() {
        let theta = array![1.0, 2.0];
        let failing = |_: &Theta| -> OptResult<f64> { Err(OptError::NonFiniteCost { value: f64::NAN }) };
        let err = gradient_discrepancy(&theta, failing, &array![0.0, 0.0])
            .expect_err("objective failure should propagate");
        assert!(matches!(err, OptError::NonFiniteCost { .. }));

        let ok = |t: &Theta| -> OptResult<f64> { Ok(t.sum()) };
        let err = gradient_discrepancy(&theta, ok, &array![1.0])
            .expect_err("length mismatch should be rejected");
        assert_eq!(err, OptError::GradientDimMismatch { expected: 2, found: 1 });
    }
}
