//! Multinomial logistic regression used as the reference classifier.
//!
//! Purpose
//! -------
//! Give the ordinal model an unordered competitor fitted by the same
//! optimizer stack: one linear score per class, softmax probabilities, and
//! an arg-max prediction.
//!
//! Model
//! -----
//! Parameters `θ = [vec(W) (K × D, row-major); b (K)]`, scores
//! `S = X Wᵀ + b`, and the penalized log-likelihood
//!
//! ```text
//! ℓ(θ) = Σ_i (S[i, y_i] − logsumexp(S[i, :])) − ‖W‖² / (2C)
//! ```
//!
//! with gradient `∂ℓ/∂W = (Y − P)ᵀ X − W / C`, `∂ℓ/∂b = Σ_i (Y − P)[i, :]`
//! where `Y` is the one-hot label matrix and `P` the softmax probabilities.
//! The intercept is not penalized. Fitting starts from `θ = 0`.
//!
//! Conventions
//! -----------
//! - Labels go through the same [`LabelEncoding`] as the ordinal model; the
//!   class order is irrelevant to this model.
//! - Ties in the arg-max go to the lowest class rank.
use crate::{
    evaluation::errors::{EvalError, EvalResult},
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, maximize},
    },
    ordinal::{
        core::data::{LabelEncoding, OrdinalData},
        errors::OrdinalError,
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

pub const DEFAULT_INVERSE_REGULARIZATION: f64 = 1.0;

/// Fit-time options of [`MultinomialLogit`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineOptions {
    /// Inverse L2 strength `C`; larger means weaker shrinkage.
    pub c: f64,
    pub mle_opts: MLEOptions,
}

impl BaselineOptions {
    /// # Errors
    /// [`EvalError::InvalidRegularization`] unless `c` is finite and `> 0`.
    pub fn new(c: f64, mle_opts: MLEOptions) -> EvalResult<Self> {
        if !(c.is_finite() && c > 0.0) {
            return Err(EvalError::InvalidRegularization { value: c });
        }
        Ok(Self { c, mle_opts })
    }
}

impl Default for BaselineOptions {
    fn default() -> Self {
        Self { c: DEFAULT_INVERSE_REGULARIZATION, mle_opts: MLEOptions::default() }
    }
}

/// Fitted coefficients of [`MultinomialLogit`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineFit {
    /// Class weights, `K × D`.
    pub coef: Array2<f64>,
    /// Class intercepts, length `K`.
    pub intercept: Array1<f64>,
    /// Penalized negative log-likelihood at the optimum.
    pub objective: f64,
    pub outcome: OptimOutcome,
}

/// L2-penalized multinomial logistic regression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultinomialLogit {
    pub options: BaselineOptions,
    pub fitted: Option<BaselineFit>,
}

impl MultinomialLogit {
    pub fn new(options: BaselineOptions) -> Self {
        Self { options, fitted: None }
    }

    /// Fit on features `x` and labels `y`.
    ///
    /// # Errors
    /// - Input validation errors from [`OrdinalData::from_labels`].
    /// - Optimizer failures from [`maximize`].
    pub fn fit<L: PartialOrd + Clone>(
        &mut self, x: ArrayView2<f64>, y: &[L],
    ) -> EvalResult<LabelEncoding<L>> {
        self.fitted = None;
        let (data, encoding) = OrdinalData::from_labels(x, y)?;
        let (k, d) = (data.n_classes, data.n_features());
        let theta0 = Array1::<f64>::zeros(k * d + k);

        let outcome = maximize(&*self, theta0, &data, &self.options.mle_opts)?;
        if !outcome.converged {
            tracing::warn!(
                status = %outcome.status,
                iterations = outcome.iterations,
                "baseline solver stopped without converging"
            );
        }
        let (coef, intercept) = unpack(outcome.theta_hat.view(), k, d);
        tracing::debug!(objective = -outcome.value, iterations = outcome.iterations, "baseline fit finished");
        self.fitted = Some(BaselineFit { coef, intercept, objective: -outcome.value, outcome });
        Ok(encoding)
    }

    /// Arg-max class rank for every row of `x`.
    ///
    /// # Errors
    /// - [`EvalError::ModelNotFitted`] before a successful fit.
    /// - [`OrdinalError::FeatureCountMismatch`] / [`OrdinalError::NonFiniteFeature`]
    ///   (wrapped) for malformed `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> EvalResult<Vec<usize>> {
        let fitted = self.fitted.as_ref().ok_or(EvalError::ModelNotFitted)?;
        if x.ncols() != fitted.coef.ncols() {
            return Err(OrdinalError::FeatureCountMismatch {
                expected: fitted.coef.ncols(),
                actual: x.ncols(),
            }
            .into());
        }
        if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(OrdinalError::NonFiniteFeature { row, col, value }.into());
        }
        let scores = x.dot(&fitted.coef.t()) + &fitted.intercept;
        Ok(scores.rows().into_iter().map(argmax).collect())
    }

    /// Predict label values using the encoding returned by [`fit`](Self::fit).
    pub fn predict_labels<L: PartialOrd + Clone>(
        &self, x: ArrayView2<f64>, encoding: &LabelEncoding<L>,
    ) -> EvalResult<Vec<L>> {
        Ok(encoding.decode_all(&self.predict(x)?)?)
    }
}

impl LogLikelihood for MultinomialLogit {
    type Data = OrdinalData;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let (k, d) = (data.n_classes, data.n_features());
        let (coef, intercept) = unpack(theta.view(), k, d);
        let scores = data.x.dot(&coef.t()) + &intercept;

        let mut ll = 0.0;
        for (row, &r) in scores.rows().into_iter().zip(&data.ranks) {
            ll += row[r] - log_sum_exp(row);
        }
        ll -= coef.mapv(|v| v * v).sum() / (2.0 * self.options.c);
        Ok(ll)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        let expected = data.n_classes * (data.n_features() + 1);
        if theta.len() != expected {
            return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let (k, d) = (data.n_classes, data.n_features());
        let (coef, intercept) = unpack(theta.view(), k, d);
        let scores = data.x.dot(&coef.t()) + &intercept;

        // Residuals Y − P.
        let mut resid = Array2::<f64>::zeros((data.n_samples(), k));
        for ((row, mut out), &r) in scores.rows().into_iter().zip(resid.rows_mut()).zip(&data.ranks) {
            let lse = log_sum_exp(row);
            for c in 0..k {
                let target = if c == r { 1.0 } else { 0.0 };
                out[c] = target - (row[c] - lse).exp();
            }
        }

        let g_coef = resid.t().dot(&data.x) - &(coef / self.options.c);
        let g_intercept = resid.sum_axis(Axis(0));
        Ok(g_coef.iter().chain(g_intercept.iter()).copied().collect())
    }
}

fn unpack(theta: ArrayView1<f64>, k: usize, d: usize) -> (Array2<f64>, Array1<f64>) {
    let coef = Array2::from_shape_fn((k, d), |(c, j)| theta[c * d + j]);
    let intercept = Array1::from_shape_fn(k, |c| theta[k * d + c]);
    (coef, intercept)
}

fn log_sum_exp(v: ArrayView1<f64>) -> f64 {
    let m = v.fold(f64::NEG_INFINITY, |acc, &x| acc.max(x));
    if !m.is_finite() {
        return m;
    }
    m + v.iter().map(|&x| (x - m).exp()).sum::<f64>().ln()
}

fn argmax(v: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (c, &s) in v.iter().enumerate() {
        if s > v[best] {
            best = c;
        }
    }
    best
}
