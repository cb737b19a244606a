//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin_math::ArgminL2Norm;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// This is the shared runner used by both line-search variants. It wires up:
/// - the user model via [`ArgMinAdapter`],
/// - the chosen `Solver` (L-BFGS with Hager–Zhang/More–Thuente),
/// - the initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Arguments
/// - `theta0`: Initial parameter vector, consumed into the optimizer state.
/// - `opts`: Optimizer options (tolerances, verbosity, max iters).
/// - `problem`: An [`ArgMinAdapter`] wrapping the user’s model and data.
/// - `solver`: A fully constructed solver (see
///   [`builders`](crate::optimization::loglik_optimizer::builders)).
///
/// # Logging
/// With `opts.verbose`, ℓ(θ₀) and ‖∇ℓ(θ₀)‖ are emitted at `debug` level
/// before the first iteration; with the `obs_slog` feature a terminal slog
/// observer is additionally attached with `ObserverMode::Always`. A summary
/// of every run is emitted at `debug` level.
///
/// # Errors
/// - Propagates any `argmin` runtime error (solver errors, line-search
///   failures, model errors raised inside the cost) via
///   `From<argmin::core::Error>`.
/// - Propagates validation errors encountered when constructing
///   [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )?;
    tracing::debug!(
        iterations = outcome.iterations,
        value = outcome.value,
        converged = outcome.converged,
        status = %outcome.status,
        "L-BFGS run finished"
    );
    Ok(outcome)
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    tracing::debug!(loglik = ll0, grad_norm = ?g0n, "initial state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{
            builders::build_optimizer_more_thuente,
            traits::{LineSearcher, Tolerances},
        },
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Verbose runs: the starting-state log (and, with `obs_slog`, the slog
    //   observer) on a converging problem.
    // - Errors raised while logging the starting state.
    //
    // They intentionally DO NOT cover:
    // - Solver selection, covered by `maximize` through the model tests.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -Σ (θ_i - 2)², or a non-finite value everywhere when `broken`.
    struct Bowl {
        broken: bool,
    }

    impl LogLikelihood for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            if self.broken {
                return Ok(f64::NAN);
            }
            Ok(-theta.mapv(|t| (t - 2.0).powi(2)).sum())
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(theta.mapv(|t| -2.0 * (t - 2.0)))
        }
    }

    fn verbose_opts() -> MLEOptions {
        let tols = Tolerances::new(Some(1e-8), Some(1e-14), Some(100)).expect("valid tolerances");
        MLEOptions::new(tols, LineSearcher::MoreThuente, true, None).expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // A verbose run logs its starting state and still reaches the optimum.
    //
    // Given
    // -----
    // - A separable quadratic with maximum at (2, 2) and `verbose = true`.
    //
    // Expect
    // ------
    // - Convergence with `theta_hat ≈ (2, 2)` and `value ≈ 0`.
    fn verbose_run_reaches_optimum() {
        let opts = verbose_opts();
        let model = Bowl { broken: false };
        let solver = build_optimizer_more_thuente(&opts).expect("solver");

        let outcome =
            run_lbfgs(array![0.5, -1.0], &opts, ArgMinAdapter::new(&model, &()), solver).expect("run");

        assert!(outcome.converged);
        assert!(outcome.theta_hat.iter().all(|t| (t - 2.0).abs() < 1e-5));
        assert!(outcome.value.abs() < 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // Logging the starting state evaluates the cost, so a non-finite start
    // fails before the solver runs.
    fn verbose_run_reports_non_finite_start() {
        let opts = verbose_opts();
        let model = Bowl { broken: true };
        let solver = build_optimizer_more_thuente(&opts).expect("solver");

        let err = run_lbfgs(array![0.0], &opts, ArgMinAdapter::new(&model, &()), solver)
            .expect_err("non-finite start");
        assert!(matches!(err, OptError::NonFiniteCost { .. }));
    }
}
