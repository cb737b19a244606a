//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer, numerically stable feasibility
//! transforms, and a single error/result surface. Callers implement a
//! log-likelihood, choose tolerances, and obtain fitted parameters and
//! diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including solver and stopping-rule configuration.
//! - Supply numerical primitives (`numerical_stability`) for mapping
//!   unconstrained coordinates into boxes and ordered intervals, which is
//!   how bound and ordering constraints are enforced.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space and assume
//!   finite inputs once validation has passed; invalid states are reported
//!   as `OptError`, not panics.
//! - Constraint handling lives entirely in the model layer: the solver
//!   never sees bounds, only unconstrained coordinates.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user-facing outcomes are expressed in terms of `ℓ`.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Logging is limited to `tracing` events at `debug` level inside the
//!   runner; subscribers are installed by front-ends.
//!
//! Testing notes
//! -------------
//! - `loglik_optimizer`: solver wiring, tolerance handling, and basic MLE
//!   behavior on toy models.
//! - `numerical_stability`: tails, round trips, and finite-difference
//!   checks of every transform derivative.
//! - `errors`: conversions from backend/model errors into `OptError`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_ordinal::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
