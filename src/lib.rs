//! rust_ordinal — ordinal logistic regression with monotone thresholds.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing the model to Python through the
//! `_rust_ordinal` extension module.
//!
//! Key behaviors
//! -------------
//! - [`ordinal`]: the model (label encoding, likelihood, constraints, fit,
//!   nearest-midpoint prediction).
//! - [`optimization`]: the generic L-BFGS maximum-likelihood layer on top of
//!   `argmin`, plus numerically stable transforms.
//! - [`evaluation`]: table loading, stratified splits, the multinomial
//!   baseline and cross-validation used by the `ordinal_cv` binary.
//! - `OrdinalLogistic` (`#[pyclass]`): thin Python wrapper around
//!   [`ordinal::OrdinalLogitModel`].
//!
//! Conventions
//! -----------
//! - Python labels are `float64`; predictions come back as label values,
//!   not ranks.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary.

pub mod evaluation;
pub mod optimization;
pub mod ordinal;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    ordinal::{
        core::data::LabelEncoding, errors::OrdinalError, models::ordinal_logit::OrdinalFit,
        models::ordinal_logit::OrdinalLogitModel,
    },
    utils::{build_ordinal_options, extract_f64_matrix, extract_f64_vector},
};

/// OrdinalLogistic — Python-facing wrapper for [`OrdinalLogitModel`].
///
/// Constructed from Python via
/// `OrdinalLogistic(tol_grad=None, tol_cost=None, max_iter=None,
/// line_searcher=None, lbfgs_mem=None, weight_bound=None,
/// threshold_range=None, grad_check_tol=None, strict=None, verbose=None)`;
/// unset values take the Rust defaults. `strict=True` turns an unconverged
/// solver run into an exception instead of a warning; `verbose=True` logs
/// the solver's starting state (and every iteration with `obs_slog`).
///
/// Fitted attributes raise `ValueError` until `fit` has succeeded.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_ordinal", unsendable)]
pub struct OrdinalLogistic {
    inner: OrdinalLogitModel,
    encoding: Option<LabelEncoding<f64>>,
}

#[cfg(feature = "python-bindings")]
impl OrdinalLogistic {
    fn fitted(&self) -> PyResult<&OrdinalFit> {
        Ok(self.inner.fitted.as_ref().ok_or(OrdinalError::ModelNotFitted)?)
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl OrdinalLogistic {
    #[new]
    #[pyo3(
        signature = (
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            weight_bound = None,
            threshold_range = None,
            grad_check_tol = None,
            strict = None,
            verbose = None,
        ),
        text_signature = "(/, tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                          lbfgs_mem=None, weight_bound=None, threshold_range=None, \
                          grad_check_tol=None, strict=None, verbose=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, weight_bound: Option<f64>,
        threshold_range: Option<(f64, f64)>, grad_check_tol: Option<f64>, strict: Option<bool>,
        verbose: Option<bool>,
    ) -> PyResult<Self> {
        let options = build_ordinal_options(
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            weight_bound,
            threshold_range,
            grad_check_tol,
            strict,
            verbose,
        )?;
        Ok(OrdinalLogistic { inner: OrdinalLogitModel::new(options), encoding: None })
    }

    /// Fit on an `(N, D)` feature matrix and `N` ordinal labels.
    #[pyo3(signature = (x, y), text_signature = "(self, x, y, /)")]
    pub fn fit<'py>(&mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>) -> PyResult<()> {
        self.encoding = None;
        let x = extract_f64_matrix(x)?;
        let y = extract_f64_vector(y)?;
        let labels = y.to_vec();
        let encoding = self.inner.fit(x.view(), &labels)?;
        self.encoding = Some(encoding);
        Ok(())
    }

    /// Predicted label values for the rows of `x`.
    #[pyo3(signature = (x), text_signature = "(self, x, /)")]
    pub fn predict<'py>(&self, x: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let encoding = self.encoding.as_ref().ok_or(OrdinalError::ModelNotFitted)?;
        let x = extract_f64_matrix(x)?;
        Ok(self.inner.predict_labels(x.view(), encoding)?)
    }

    #[getter]
    pub fn weights(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.weights.to_vec())
    }

    /// One threshold per class, non-decreasing.
    #[getter]
    pub fn thresholds(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.thresholds.to_vec())
    }

    /// Upper threshold of each training sample's class, in input order.
    #[getter]
    pub fn sample_thresholds(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.sample_thresholds.to_vec())
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        Ok(self.fitted()?.outcome.converged)
    }

    #[getter]
    pub fn status(&self) -> PyResult<String> {
        Ok(self.fitted()?.outcome.status.clone())
    }

    #[getter]
    pub fn iterations(&self) -> PyResult<usize> {
        Ok(self.fitted()?.outcome.iterations)
    }

    /// Negative log-likelihood at the fitted parameters.
    #[getter]
    pub fn objective(&self) -> PyResult<f64> {
        Ok(self.fitted()?.objective)
    }
}

/// Module initializer for the `_rust_ordinal` extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_ordinal<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<OrdinalLogistic>()?;
    Ok(())
}
