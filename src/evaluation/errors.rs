//! Errors for the evaluation layer (data loading, splitting, baseline model,
//! cross-validation).
//!
//! ## Conventions
//! - **Line and column numbers are 1-based**, matching what a text editor
//!   shows for the input file.
//! - Model and optimizer failures are carried unchanged in
//!   [`EvalError::Ordinal`] / [`EvalError::Optimizer`].
use crate::{optimization::errors::OptError, ordinal::errors::OrdinalError};

/// Result alias for evaluation operations that may produce [`EvalError`].
pub type EvalResult<T> = Result<T, EvalError>;

/// Unified error type for the evaluation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    // ---- Loading ----
    /// Reading the data file failed.
    Io { path: String, text: String },

    /// A token is not a number.
    Parse { line: usize, column: usize, token: String },

    /// A row has a different number of columns than the first row.
    Ragged { line: usize, expected: usize, found: usize },

    /// Rows need at least one feature column plus the label column.
    TooFewColumns { line: usize, found: usize },

    /// The input contains no data rows.
    EmptyTable,

    /// A loaded label is not a whole number.
    NonIntegerLabel { row: usize, value: f64 },

    /// Unknown centering mode name.
    UnknownCentering { name: String },

    // ---- Splitting ----
    /// Split configuration or data cannot produce the requested folds.
    InvalidSplit { reason: String },

    // ---- Baseline ----
    /// The baseline's inverse regularization strength must be finite and > 0.
    InvalidRegularization { value: f64 },

    /// The baseline model was used before fitting.
    ModelNotFitted,

    // ---- Scoring ----
    /// Predictions and ground truth differ in length.
    LengthMismatch { predicted: usize, expected: usize },

    /// Accuracy of an empty prediction set is undefined.
    EmptyPredictions,

    // ---- Wrapped ----
    /// Ordinal model failure.
    Ordinal(OrdinalError),

    /// Optimizer failure.
    Optimizer(OptError),
}

impl std::error::Error for EvalError {}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Loading ----
            EvalError::Io { path, text } => write!(f, "Failed to read '{path}': {text}"),
            EvalError::Parse { line, column, token } => {
                write!(f, "Line {line}, column {column}: '{token}' is not a number.")
            }
            EvalError::Ragged { line, expected, found } => {
                write!(f, "Line {line} has {found} columns; expected {expected}.")
            }
            EvalError::TooFewColumns { line, found } => write!(
                f,
                "Line {line} has {found} column(s); at least one feature and a label are required."
            ),
            EvalError::EmptyTable => write!(f, "Input table contains no data rows."),
            EvalError::NonIntegerLabel { row, value } => {
                write!(f, "Label {value} in data row {row} is not a whole number.")
            }
            EvalError::UnknownCentering { name } => write!(
                f,
                "Unknown centering '{name}'; valid options are 'global', 'per-column' and 'none'."
            ),
            // ---- Splitting ----
            EvalError::InvalidSplit { reason } => write!(f, "Invalid split: {reason}"),
            // ---- Baseline ----
            EvalError::InvalidRegularization { value } => {
                write!(f, "Inverse regularization strength must be finite and > 0; got {value}")
            }
            EvalError::ModelNotFitted => write!(f, "Baseline model hasn't been fitted yet."),
            // ---- Scoring ----
            EvalError::LengthMismatch { predicted, expected } => {
                write!(f, "Got {predicted} predictions for {expected} samples.")
            }
            EvalError::EmptyPredictions => write!(f, "Cannot score an empty prediction set."),
            // ---- Wrapped ----
            EvalError::Ordinal(err) => write!(f, "Ordinal model error: {err}"),
            EvalError::Optimizer(err) => write!(f, "Optimizer error: {err}"),
        }
    }
}

impl From<OrdinalError> for EvalError {
    fn from(err: OrdinalError) -> Self {
        EvalError::Ordinal(err)
    }
}

impl From<OptError> for EvalError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ModelError(inner) => EvalError::Ordinal(*inner),
            other => EvalError::Optimizer(other),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<EvalError> for pyo3::PyErr {
    fn from(err: EvalError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Wrapped errors keep their payload and messages name the location.
    fn wrapping_and_messages() {
        let wrapped: EvalError = OrdinalError::EmptyInput.into();
        assert_eq!(wrapped, EvalError::Ordinal(OrdinalError::EmptyInput));
        assert!(wrapped.to_string().contains("Ordinal model error"));

        let parse = EvalError::Parse { line: 3, column: 2, token: "x1".to_string() };
        assert_eq!(parse.to_string(), "Line 3, column 2: 'x1' is not a number.");

        let from_solver: EvalError = OptError::ModelError(Box::new(OrdinalError::EmptyInput)).into();
        assert_eq!(from_solver, EvalError::Ordinal(OrdinalError::EmptyInput));
        let solver: EvalError = OptError::UnknownError.into();
        assert_eq!(solver, EvalError::Optimizer(OptError::UnknownError));
    }
}
