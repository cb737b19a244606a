//! Errors for the ordinal logistic model (input validation, parameter layout,
//! options, fitting preconditions, and prediction).
//!
//! This module defines the model error type, [`OrdinalError`], used across the
//! Rust core and (behind `python-bindings`) the Python-facing API. It
//! implements `Display`/`Error` and converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy). Row/column indices refer to
//!   the caller's original sample order.
//! - Optimizer/backend errors are carried unchanged in
//!   [`OrdinalError::Optimizer`].
use crate::optimization::errors::OptError;

/// Result alias for ordinal-model operations that may produce [`OrdinalError`].
pub type OrdinalResult<T> = Result<T, OrdinalError>;

/// Unified error type for ordinal logistic regression.
#[derive(Debug, Clone, PartialEq)]
pub enum OrdinalError {
    // ---- Input/data validation ----
    /// No samples were supplied.
    EmptyInput,

    /// The feature matrix has zero columns.
    NoFeatures,

    /// Feature rows and labels disagree in length.
    ShapeMismatch { rows: usize, labels: usize },

    /// A feature value is NaN/±inf.
    NonFiniteFeature { row: usize, col: usize, value: f64 },

    /// A label cannot be ordered (e.g. a NaN label).
    IncomparableLabel { index: usize },

    /// Fewer than two distinct labels were supplied.
    TooFewClasses { found: usize },

    /// A class rank is outside `0..n_classes`.
    RankOutOfRange { index: usize, rank: usize, n_classes: usize },

    // ---- Parameter layout ----
    /// Parameter vector length does not match `n_features + n_classes`.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// A parameter entry is NaN/±inf.
    NonFiniteParam { index: usize, value: f64 },

    /// A starting parameter lies outside its box bounds.
    StartOutsideBounds { index: usize, value: f64, lower: f64, upper: f64 },

    // ---- Options validation ----
    /// Weight bound must be finite and > 0.
    InvalidWeightBound { value: f64 },

    /// Threshold range must be finite with lower < upper.
    InvalidThresholdRange { lower: f64, upper: f64 },

    /// Gradient-check tolerance must be finite and > 0.
    InvalidGradCheckTol { value: f64 },

    // ---- Estimation ----
    /// Analytic and numerical gradients disagree at the starting point.
    GradientCheckFailed { discrepancy: f64, tol: f64 },

    /// Solver stopped without converging (only under `ConvergencePolicy::Error`).
    NotConverged { status: String, iterations: usize },

    /// Optimizer failure, carried unchanged.
    Optimizer(OptError),

    /// Model hasn't been fitted yet.
    ModelNotFitted,

    // ---- Prediction ----
    /// No thresholds were supplied to the predictor.
    EmptyThresholds,

    /// A threshold supplied to the predictor is NaN/±inf.
    NonFiniteThreshold { index: usize, value: f64 },

    /// Test features do not match the number of fitted weights.
    FeatureCountMismatch { expected: usize, actual: usize },
}

impl std::error::Error for OrdinalError {}

impl std::fmt::Display for OrdinalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            OrdinalError::EmptyInput => {
                write!(f, "Input is empty: at least one sample is required.")
            }
            OrdinalError::NoFeatures => {
                write!(f, "Feature matrix has no columns.")
            }
            OrdinalError::ShapeMismatch { rows, labels } => {
                write!(f, "Feature matrix has {rows} rows but {labels} labels were given.")
            }
            OrdinalError::NonFiniteFeature { row, col, value } => {
                write!(f, "Feature at row {row}, column {col} is non-finite: {value}")
            }
            OrdinalError::IncomparableLabel { index } => {
                write!(f, "Label at index {index} cannot be ordered against the others.")
            }
            OrdinalError::TooFewClasses { found } => {
                write!(f, "At least 2 distinct labels are required; found {found}.")
            }
            OrdinalError::RankOutOfRange { index, rank, n_classes } => {
                write!(f, "Class rank {rank} at index {index} is outside 0..{n_classes}.")
            }
            // ---- Parameter layout ----
            OrdinalError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, got {actual}")
            }
            OrdinalError::NonFiniteParam { index, value } => {
                write!(f, "Parameter at index {index} is non-finite: {value}")
            }
            OrdinalError::StartOutsideBounds { index, value, lower, upper } => {
                write!(
                    f,
                    "Starting parameter at index {index} is {value}, outside [{lower}, {upper}]."
                )
            }
            // ---- Options validation ----
            OrdinalError::InvalidWeightBound { value } => {
                write!(f, "Weight bound must be finite and > 0; got: {value}")
            }
            OrdinalError::InvalidThresholdRange { lower, upper } => {
                write!(f, "Threshold range must be finite with lower < upper; got [{lower}, {upper}]")
            }
            OrdinalError::InvalidGradCheckTol { value } => {
                write!(f, "Gradient-check tolerance must be finite and > 0; got: {value}")
            }
            // ---- Estimation ----
            OrdinalError::GradientCheckFailed { discrepancy, tol } => {
                write!(
                    f,
                    "Gradient check failed: discrepancy {discrepancy} is not below tolerance {tol}."
                )
            }
            OrdinalError::NotConverged { status, iterations } => {
                write!(f, "Solver did not converge after {iterations} iterations: {status}")
            }
            OrdinalError::Optimizer(err) => {
                write!(f, "Optimizer failed: {err}")
            }
            OrdinalError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
            // ---- Prediction ----
            OrdinalError::EmptyThresholds => {
                write!(f, "At least one threshold is required for prediction.")
            }
            OrdinalError::NonFiniteThreshold { index, value } => {
                write!(f, "Threshold at index {index} is non-finite: {value}")
            }
            OrdinalError::FeatureCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} feature columns, got {actual}.")
            }
        }
    }
}

impl From<OptError> for OrdinalError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ModelError(inner) => *inner,
            other => OrdinalError::Optimizer(other),
        }
    }
}

/// Convert an [`OrdinalError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<OrdinalError> for pyo3::PyErr {
    fn from(err: OrdinalError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
