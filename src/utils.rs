//! PyO3 conversion helpers for the Python bindings.
//!
//! Arrays are accepted as NumPy arrays, pandas objects (via `to_numpy`) or
//! plain Python sequences, and copied into owned `ndarray` buffers.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
    ordinal::core::options::{
        ConvergencePolicy, DEFAULT_GRAD_CHECK_TOL, DEFAULT_MAX_ITER, DEFAULT_THRESHOLD_RANGE,
        DEFAULT_WEIGHT_BOUND, OrdinalOptions,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro.as_array().to_owned());
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(Array1::from(vec))
}

#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err(format!(
            "row {i} has {} columns; expected {n_cols}",
            rows[i].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((flat.len() / n_cols.max(1), n_cols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    let tols = Tolerances::new(
        Some(tol_grad.unwrap_or(1e-6)),
        Some(tol_cost.unwrap_or(1e-12)),
        Some(max_iter.unwrap_or(DEFAULT_MAX_ITER)),
    )?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => LineSearcher::MoreThuente,
    };
    Ok(MLEOptions::new(tols, ls, verbose.unwrap_or(false), lbfgs_mem)?)
}

#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_ordinal_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, weight_bound: Option<f64>,
    threshold_range: Option<(f64, f64)>, grad_check_tol: Option<f64>, strict: Option<bool>,
    verbose: Option<bool>,
) -> PyResult<OrdinalOptions> {
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
    let convergence =
        if strict.unwrap_or(false) { ConvergencePolicy::Error } else { ConvergencePolicy::Warn };
    Ok(OrdinalOptions::new(
        mle_opts,
        weight_bound.unwrap_or(DEFAULT_WEIGHT_BOUND),
        threshold_range.unwrap_or(DEFAULT_THRESHOLD_RANGE),
        grad_check_tol.unwrap_or(DEFAULT_GRAD_CHECK_TOL),
        convergence,
    )?)
}
