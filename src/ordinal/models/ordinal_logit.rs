//! Ordinal logistic regression: `LogLikelihood` wiring, fitting and prediction.
//!
//! The model works on label-sorted [`OrdinalData`]. Fitting:
//!
//! 1. Builds the starting point (unit weights, thresholds evenly spaced over
//!    the threshold range) and checks it against the box bounds.
//! 2. Audits the analytic gradient against finite differences at that point
//!    and aborts with [`OrdinalError::GradientCheckFailed`] on disagreement.
//! 3. Maps the start into the solver space of [`FeasibleMap`] and maximizes
//!    `−NLL` with L-BFGS there, so every iterate is ordered and in bounds.
//! 4. Applies the configured [`ConvergencePolicy`] to the solver status.
//! 5. Maps the best iterate back, expands thresholds per sample and restores
//!    the caller's sample order.
use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            Grad, LogLikelihood, OptimOutcome, Theta, finite_diff::gradient_discrepancy, maximize,
        },
    },
    ordinal::{
        core::{
            constraints::{is_ordered, threshold_constraints},
            data::{LabelEncoding, OrdinalData},
            links::{ThresholdBound, lower_bound},
            objective::{log_space_gradient, log_space_nll, negative_log_likelihood, nll_gradient},
            options::{ConvergencePolicy, OrdinalOptions},
            params::{ParamBounds, ParamLayout},
            predict::predict_classes,
            transform::FeasibleMap,
        },
        errors::{OrdinalError, OrdinalResult},
    },
};
use ndarray::{Array1, ArrayView2};

/// Fitted parameters and diagnostics of one [`OrdinalLogitModel::fit`] call.
///
/// Per-sample vectors follow the caller's original sample order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalFit {
    /// Regression weights `w`, length `D`.
    pub weights: Array1<f64>,
    /// One threshold per class, non-decreasing, length `K`.
    pub thresholds: Array1<f64>,
    /// Upper threshold of each sample's class, length `N`.
    pub sample_thresholds: Array1<f64>,
    /// Lower boundary of each sample's class; `Unbounded` for the lowest class.
    pub sample_lower_bounds: Vec<ThresholdBound>,
    /// Negative log-likelihood at the starting point.
    pub initial_objective: f64,
    /// Negative log-likelihood at the fitted parameters.
    pub objective: f64,
    /// `‖∇_analytic − ∇_fd‖₂` measured at the starting point.
    pub gradient_discrepancy: f64,
    /// Threshold gaps `θ[k+1] − θ[k]` at the fitted parameters.
    pub constraint_values: Array1<f64>,
    /// Solver report (status, iterations, evaluation counts).
    pub outcome: OptimOutcome,
}

impl OrdinalFit {
    /// `[w; θ]` in natural parameter space.
    pub fn params(&self) -> Array1<f64> {
        self.weights.iter().chain(self.thresholds.iter()).copied().collect()
    }
}

/// Ordinal logistic regression with monotone thresholds.
///
/// After a successful [`fit`](Self::fit), [`fitted`](Self::fitted) holds the
/// [`OrdinalFit`]; a failed fit leaves the model unfitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrdinalLogitModel {
    /// Fit-time options.
    pub options: OrdinalOptions,
    /// Fit results (populated after `fit`).
    pub fitted: Option<OrdinalFit>,
}

impl OrdinalLogitModel {
    pub fn new(options: OrdinalOptions) -> Self {
        Self { options, fitted: None }
    }

    /// Fit on features `x` and ordinal labels `y`.
    ///
    /// Labels can be any `PartialOrd` type; the returned [`LabelEncoding`]
    /// maps predicted ranks back to label values.
    ///
    /// # Errors
    /// - Input validation errors from [`OrdinalData::from_labels`].
    /// - Everything [`fit_data`](Self::fit_data) can return.
    pub fn fit<L: PartialOrd + Clone>(
        &mut self, x: ArrayView2<f64>, y: &[L],
    ) -> OrdinalResult<LabelEncoding<L>> {
        self.fitted = None;
        let (data, encoding) = OrdinalData::from_labels(x, y)?;
        self.fit_data(&data)?;
        Ok(encoding)
    }

    /// Fit on already encoded, label-sorted data.
    ///
    /// # Errors
    /// - [`OrdinalError::StartOutsideBounds`] if the starting point violates
    ///   the configured bounds.
    /// - [`OrdinalError::GradientCheckFailed`] when the gradient audit fails.
    /// - [`OrdinalError::NotConverged`] under [`ConvergencePolicy::Error`].
    /// - [`OrdinalError::Optimizer`] for solver failures.
    pub fn fit_data(&mut self, data: &OrdinalData) -> OrdinalResult<&OrdinalFit> {
        self.fitted = None;
        let layout = ParamLayout::new(data.n_features(), data.n_classes);
        let (lo, hi) = self.options.threshold_range;
        let x0 = layout.initial_guess(lo, hi);
        ParamBounds::new(layout, self.options.weight_bound, self.options.threshold_range)
            .check(x0.view())?;

        let initial_objective = negative_log_likelihood(x0.view(), data.x.view(), &data.ranks, layout)?;
        let analytic = nll_gradient(x0.view(), data.x.view(), &data.ranks, layout)?;
        let nll = |p: &Theta| -> OptResult<f64> {
            Ok(negative_log_likelihood(p.view(), data.x.view(), &data.ranks, layout)?)
        };
        let discrepancy = gradient_discrepancy(&x0, nll, &analytic)?;
        if discrepancy.is_nan() || discrepancy >= self.options.grad_check_tol {
            return Err(OrdinalError::GradientCheckFailed {
                discrepancy,
                tol: self.options.grad_check_tol,
            });
        }
        tracing::debug!(discrepancy, initial_objective, "gradient check passed");

        let map = self.feasible_map(layout);
        let z0 = map.to_solver(x0.view())?;
        let outcome = maximize(&*self, z0, data, &self.options.mle_opts)?;
        if !outcome.converged {
            match self.options.convergence {
                ConvergencePolicy::Warn => tracing::warn!(
                    status = %outcome.status,
                    iterations = outcome.iterations,
                    "solver stopped without converging; keeping best iterate"
                ),
                ConvergencePolicy::Error => {
                    return Err(OrdinalError::NotConverged {
                        status: outcome.status.clone(),
                        iterations: outcome.iterations,
                    });
                }
            }
        }

        let natural = map.to_natural(outcome.theta_hat.view())?;
        let params = natural.params;
        let weights = layout.weights(params.view()).to_owned();
        let thresholds = layout.thresholds(params.view()).to_owned();
        let constraint_values = threshold_constraints(params.view(), layout)?;

        let sorted_upper: Vec<f64> = data.ranks.iter().map(|&r| thresholds[r]).collect();
        let sorted_lower: Vec<ThresholdBound> =
            data.ranks.iter().map(|&r| lower_bound(thresholds.view(), r)).collect();
        let objective = negative_log_likelihood(params.view(), data.x.view(), &data.ranks, layout)?;
        tracing::debug!(
            initial_objective,
            objective,
            status = %outcome.status,
            iterations = outcome.iterations,
            ordered = is_ordered(constraint_values.view(), 0.0),
            "ordinal logit fit finished"
        );

        Ok(&*self.fitted.insert(OrdinalFit {
            weights,
            thresholds,
            sample_thresholds: Array1::from(data.unsort(&sorted_upper)),
            sample_lower_bounds: data.unsort(&sorted_lower),
            initial_objective,
            objective,
            gradient_discrepancy: discrepancy,
            constraint_values,
            outcome,
        }))
    }

    /// Predict class ranks for the rows of `x`.
    ///
    /// # Errors
    /// - [`OrdinalError::ModelNotFitted`] before a successful fit.
    /// - Predictor input errors from [`predict_classes`].
    pub fn predict(&self, x: ArrayView2<f64>) -> OrdinalResult<Vec<usize>> {
        let fitted = self.fitted.as_ref().ok_or(OrdinalError::ModelNotFitted)?;
        predict_classes(x, fitted.weights.view(), fitted.thresholds.view())
    }

    /// Predict label values using the encoding returned by [`fit`](Self::fit).
    pub fn predict_labels<L: PartialOrd + Clone>(
        &self, x: ArrayView2<f64>, encoding: &LabelEncoding<L>,
    ) -> OrdinalResult<Vec<L>> {
        encoding.decode_all(&self.predict(x)?)
    }

    /// Solver report of the last successful fit.
    pub fn results(&self) -> Option<&OptimOutcome> {
        self.fitted.as_ref().map(|f| &f.outcome)
    }

    fn feasible_map(&self, layout: ParamLayout) -> FeasibleMap {
        FeasibleMap::new(layout, self.options.weight_bound, self.options.threshold_range)
    }

    fn data_map(&self, data: &OrdinalData) -> FeasibleMap {
        self.feasible_map(ParamLayout::new(data.n_features(), data.n_classes))
    }
}

impl LogLikelihood for OrdinalLogitModel {
    type Data = OrdinalData;

    /// `ℓ(z) = −NLL(natural(z))`, evaluated in log space so that trial
    /// points with saturated sigmoids keep a finite cost.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let map = self.data_map(data);
        let natural = map.to_natural(theta.view())?;
        let nll = log_space_nll(natural.params.view(), data.x.view(), &data.ranks, map.layout)?;
        Ok(-nll)
    }

    /// Solver vectors must be `D + K + 1` long and finite.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        self.data_map(data).check_solver(theta.view())?;
        Ok(())
    }

    /// `∇ℓ(z)`: the negated log-space gradient pulled back through the map.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let map = self.data_map(data);
        let natural = map.to_natural(theta.view())?;
        let mut g = log_space_gradient(natural.params.view(), data.x.view(), &data.ranks, map.layout)?;
        g.mapv_inplace(|v| -v);
        Ok(map.pull_back(theta.view(), natural.shares.view(), g.view())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances};
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A full fit on a small one-feature problem with non-integer, unsorted
    //   labels: objective decrease, threshold ordering, per-sample expansion
    //   in original order.
    // - The gradient audit, convergence policies and unfitted prediction.
    // - Agreement of the solver-space gradient with finite differences, also
    //   at trial points where the direct objective is infinite.
    //
    // They intentionally DO NOT cover:
    // - Out-of-sample accuracy (see the integration tests).
    // -------------------------------------------------------------------------

    /// Twelve samples in three classes labelled 1.0 < 2.5 < 7.0, interleaved.
    fn toy() -> (Array2<f64>, Vec<f64>) {
        let x = array![
            [2.0], [-2.1], [0.1], [-1.9], [2.1], [-0.1],
            [-2.0], [0.0], [1.9], [-1.8], [0.2], [2.2]
        ];
        let y = vec![7.0, 1.0, 2.5, 1.0, 7.0, 2.5, 1.0, 2.5, 7.0, 1.0, 2.5, 7.0];
        (x, y)
    }

    fn opts_with(max_iter: usize, policy: ConvergencePolicy) -> OrdinalOptions {
        let tols = Tolerances::new(Some(1e-6), Some(1e-12), Some(max_iter)).expect("valid tols");
        let mle = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid mle");
        OrdinalOptions::new(mle, 1e10, (-1.0, 1.0), 1.0, policy).expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // A default fit lowers the objective and returns well-formed parameters.
    //
    // Given
    // -----
    // - The toy problem with labels 1.0, 2.5, 7.0 in shuffled order.
    //
    // Expect
    // ------
    // - `objective < initial_objective`, both finite.
    // - Thresholds non-decreasing inside [-1, 1]; constraint values ≥ 0.
    // - Each sample's threshold equals its class threshold, in input order,
    //   and only the lowest class has an unbounded lower boundary.
    fn fit_reduces_objective_and_keeps_sample_order() {
        let (x, y) = toy();
        let mut model = OrdinalLogitModel::default();

        let encoding = model.fit(x.view(), &y).expect("fit should succeed");
        let fit = model.fitted.as_ref().expect("fitted");

        assert_eq!(encoding.classes, vec![1.0, 2.5, 7.0]);
        assert!(fit.objective.is_finite());
        assert!(fit.objective < fit.initial_objective);
        assert!(fit.gradient_discrepancy < 1.0);
        assert!(fit.thresholds.iter().all(|&t| (-1.0..=1.0).contains(&t)));
        assert!(fit.constraint_values.iter().all(|&c| c >= 0.0));
        assert_eq!(fit.sample_thresholds.len(), y.len());
        for (i, &rank) in encoding.ranks.iter().enumerate() {
            assert_eq!(fit.sample_thresholds[i], fit.thresholds[rank]);
            match fit.sample_lower_bounds[i] {
                ThresholdBound::Unbounded => assert_eq!(rank, 0),
                ThresholdBound::Bounded(t) => assert_eq!(t, fit.thresholds[rank - 1]),
            }
        }
        assert!(fit.weights[0] > 0.0);
        let (data, _) = OrdinalData::from_labels(x.view(), &y).expect("valid data");
        let recomputed =
            negative_log_likelihood(fit.params().view(), data.x.view(), &data.ranks, ParamLayout::new(1, 3))
                .expect("valid");
        assert_relative_eq!(fit.objective, recomputed, max_relative = 1e-10);

        let labels = model.predict_labels(x.view(), &encoding).expect("fitted");
        assert_eq!(labels.len(), y.len());
        assert!(labels.iter().all(|l| encoding.classes.contains(l)));
    }

    #[test]
    // Purpose
    // -------
    // A gradient-audit tolerance below forward-difference noise aborts the
    // fit before any optimization.
    fn gradient_check_failure_aborts_fit() {
        let (x, y) = toy();
        let mut opts = OrdinalOptions::default();
        opts.grad_check_tol = 1e-14;
        let mut model = OrdinalLogitModel::new(opts);

        let err = model.fit(x.view(), &y).expect_err("audit must fail");
        assert!(matches!(err, OrdinalError::GradientCheckFailed { .. }));
        assert!(model.fitted.is_none());
    }

    #[test]
    // Purpose
    // -------
    // An iteration cap of one step is reported as unconverged: a warning and
    // a usable fit under `Warn`, an error under `Error`.
    fn convergence_policy_controls_capped_runs() {
        let (x, y) = toy();

        let mut lenient = OrdinalLogitModel::new(opts_with(1, ConvergencePolicy::Warn));
        lenient.fit(x.view(), &y).expect("warn policy keeps the iterate");
        let outcome = lenient.results().expect("fitted");
        assert!(!outcome.converged);
        assert!(outcome.status.contains("MaxIters"));

        let mut strict = OrdinalLogitModel::new(opts_with(1, ConvergencePolicy::Error));
        let err = strict.fit(x.view(), &y).expect_err("error policy rejects the run");
        assert!(matches!(err, OrdinalError::NotConverged { iterations: 1, .. }));
        assert!(strict.fitted.is_none());
    }

    #[test]
    // Purpose
    // -------
    // Prediction needs a fitted model; degenerate label sets are rejected.
    fn unfitted_and_single_class_inputs_are_errors() {
        let (x, _) = toy();
        let model = OrdinalLogitModel::default();
        assert_eq!(model.predict(x.view()), Err(OrdinalError::ModelNotFitted));

        let mut model = OrdinalLogitModel::default();
        let y = vec![3_i32; x.nrows()];
        assert_eq!(model.fit(x.view(), &y), Err(OrdinalError::TooFewClasses { found: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // The gradient handed to the solver is the exact gradient of the value
    // handed to the solver.
    //
    // Given
    // -----
    // - The toy data and an arbitrary solver-space vector.
    //
    // Expect
    // ------
    // - Central differences of `value` match `grad` within 1e-5.
    fn solver_gradient_matches_finite_differences() {
        let (x, y) = toy();
        let (data, _) = OrdinalData::from_labels(x.view(), &y).expect("valid data");
        let model = OrdinalLogitModel::default();
        let z = array![0.8, -0.3, 0.4, 0.2, -0.5];

        model.check(&z, &data).expect("valid length");
        let analytic = model.grad(&z, &data).expect("finite gradient");
        let h = 1e-6;
        for j in 0..z.len() {
            let mut up = z.clone();
            let mut dn = z.clone();
            up[j] += h;
            dn[j] -= h;
            let fd = (model.value(&up, &data).expect("finite")
                - model.value(&dn, &data).expect("finite"))
                / (2.0 * h);
            assert_relative_eq!(analytic[j], fd, epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // A trial point whose bin masses round to zero still has a finite cost
    // and a gradient that is its slope.
    //
    // Given
    // -----
    // - Weight −60 in solver space, which drives the top class to scores near
    //   −120 where both of its sigmoids round to 1.
    //
    // Expect
    // ------
    // - The direct objective is `+∞` at the mapped natural parameters.
    // - `value` is finite and central differences match `grad` within 1e-4.
    fn solver_cost_stays_finite_and_consistent_under_saturation() {
        let (x, y) = toy();
        let (data, _) = OrdinalData::from_labels(x.view(), &y).expect("valid data");
        let model = OrdinalLogitModel::default();
        let z = array![-60.0, -0.3, 0.4, 0.2, -0.5];

        let natural = model.data_map(&data).to_natural(z.view()).expect("valid solver vector");
        let direct =
            negative_log_likelihood(natural.params.view(), data.x.view(), &data.ranks, ParamLayout::new(1, 3))
                .expect("valid");
        assert_eq!(direct, f64::INFINITY);

        let value = model.value(&z, &data).expect("finite cost");
        assert!(value.is_finite());
        let analytic = model.grad(&z, &data).expect("finite gradient");
        let h = 1e-6;
        for j in 0..z.len() {
            let mut up = z.clone();
            let mut dn = z.clone();
            up[j] += h;
            dn[j] -= h;
            let fd = (model.value(&up, &data).expect("finite")
                - model.value(&dn, &data).expect("finite"))
                / (2.0 * h);
            assert_relative_eq!(analytic[j], fd, epsilon = 1e-4);
        }
    }
}
