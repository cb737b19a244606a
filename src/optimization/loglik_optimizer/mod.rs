//! loglik_optimizer — MLE-friendly, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run L-BFGS with a
//! configurable line search, tolerances, and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert log-likelihoods `ℓ(θ)` into Argmin-compatible cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Expose a single entrypoint [`maximize`] that validates the initial
//!   guess with [`LogLikelihood::check`], selects an L-BFGS solver via
//!   [`builders`], executes it via [`run::run_lbfgs`] and normalizes the
//!   result into an [`OptimOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`], both as a
//!   gradient fallback and as a gradient audit
//!   ([`finite_diff::gradient_discrepancy`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `-ℓ(θ)`; user
//!   code implements `ℓ(θ)` and `∇ℓ(θ)`, never the cost directly.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] report invalid
//!   inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Configuration types ([`Tolerances`], [`MLEOptions`]) are validated on
//!   construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`].
//!   Any mapping from constrained → unconstrained space happens in the model
//!   layer (see `ordinal::core::transform`).
//! - [`OptimOutcome::value`] is expressed in log-likelihood units.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions in [`adapter`], solver
//!   construction in [`builders`], finite differences in [`finite_diff`],
//!   validation rules in [`validation`] and outcome mapping in [`traits`].
//! - The ordinal model tests exercise [`maximize`] end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_ordinal::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
