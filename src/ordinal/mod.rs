//! ordinal — ordinal logistic regression with monotone thresholds.
//!
//! Purpose
//! -------
//! Fit a cumulative-logit model `P(y ≤ k | x) = σ(θ_k − x·w)` with
//! non-decreasing thresholds `θ` and predict ordinal classes for new
//! samples. This is the main entry point of the crate and the surface the
//! evaluation layer, the CLI and the Python bindings build on.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the numerical pieces: label encoding, link functions,
//!   objective and gradient, ordering constraints, the feasible
//!   reparameterisation, options, and the nearest-midpoint predictor.
//! - [`models`] wires them into [`OrdinalLogitModel`], which audits its
//!   gradient before fitting, maximizes the likelihood with the crate's
//!   L-BFGS layer and reports solver status in an [`OrdinalFit`].
//! - [`errors`] defines [`OrdinalError`] / [`OrdinalResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two distinct, mutually comparable labels and finite features.
//! - Thresholds stay inside the configured range and ordered at every
//!   solver iterate; weights stay inside `[-weight_bound, weight_bound]`.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`OrdinalOptions`] (or use the default).
//! 2. `let enc = model.fit(x.view(), &labels)?;`
//! 3. `model.predict(x_test.view())?` for ranks, or
//!    `model.predict_labels(x_test.view(), &enc)?` for label values.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule; `tests/integration_ordinal_pipeline.rs`
//!   covers the end-to-end properties on synthetic data.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    ConvergencePolicy, LabelEncoding, OrdinalData, OrdinalOptions, ThresholdBound,
};
pub use self::errors::{OrdinalError, OrdinalResult};
pub use self::models::{OrdinalFit, OrdinalLogitModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_ordinal::ordinal::prelude::*;
//
// to import the main ordinal surface in a single line.

pub mod prelude {
    pub use super::core::{ConvergencePolicy, LabelEncoding, OrdinalOptions, ThresholdBound};
    pub use super::errors::{OrdinalError, OrdinalResult};
    pub use super::models::prelude::*;
}
