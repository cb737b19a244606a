//! core — ordinal data, link functions, objective, constraints and predictor.
//!
//! Purpose
//! -------
//! Collect the numerical building blocks of ordinal logistic regression with
//! monotone thresholds: label encoding and sorting, the cumulative-logit link
//! functions, the negative log-likelihood and its analytic gradient, the
//! threshold-ordering constraints, the feasible reparameterisation used by
//! the solver, fit options, and the nearest-midpoint predictor.
//!
//! Key behaviors
//! -------------
//! - [`LabelEncoding`] / [`OrdinalData`] turn arbitrary ordered labels into
//!   dense ranks and label-sorted rows, keeping the permutation to restore
//!   the caller's order.
//! - [`links`] computes `P_upper`/`P_lower` with an explicit
//!   [`ThresholdBound::Unbounded`] for the lowest class.
//! - [`objective`] evaluates `NLL(w, θ)` and `∇NLL` sample by sample.
//! - [`constraints`] exposes `diff(θ) ≥ 0` and its constant Jacobian.
//! - [`transform::FeasibleMap`] maps an unconstrained solver vector onto
//!   bounded, ordered natural parameters and pulls gradients back.
//! - [`predict`] assigns classes by nearest threshold midpoint.
//!
//! Invariants & assumptions
//! ------------------------
//! - Natural parameters are laid out as `[w (D); θ (K)]` ([`ParamLayout`]).
//! - Ranks are `0..K`; the lowest class has an open lower boundary.
//! - Features are used as supplied; any centering happens upstream.
//!
//! Conventions
//! -----------
//! - Fallible functions return [`OrdinalResult`](crate::ordinal::errors::OrdinalResult);
//!   numerical degeneracy in the objective shows up as a non-finite value,
//!   not as an error.
//! - No logging or I/O happens in this layer.

pub mod constraints;
pub mod data;
pub mod links;
pub mod objective;
pub mod options;
pub mod params;
pub mod predict;
pub mod transform;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::constraints::{constraint_jacobian, threshold_constraints};
pub use self::data::{LabelEncoding, OrdinalData};
pub use self::links::{ThresholdBound, p_lower, p_upper};
pub use self::objective::{DIFF_FLOOR, negative_log_likelihood, nll_gradient};
pub use self::options::{ConvergencePolicy, OrdinalOptions};
pub use self::params::{ParamBounds, ParamLayout};
pub use self::predict::{predict_classes, threshold_midpoints};
pub use self::transform::FeasibleMap;
