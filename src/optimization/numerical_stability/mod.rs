//! numerical_stability — numerically robust transformations for feasible
//! reparameterisation.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar and vector maps used to keep optimizer
//! iterates inside bounded, ordered regions. This module centralizes the
//! small tolerances and transform logic so the model layer can hand an
//! unconstrained problem to the L-BFGS solver.
//!
//! Key behaviors
//! -------------
//! - Provide a stable logistic sigmoid (`safe_logistic`) that is exact at
//!   `±∞`, which the ordinal link functions rely on.
//! - Map free coordinates into an open box with a tanh squash
//!   (`box_tanh`, its inverse and derivative).
//! - Map `m + 1` logits to `m` non-decreasing values in an open interval via
//!   a cumulative softmax with implicit slack (`cumulative_softmax`), plus
//!   its inverse and a Jacobian–vector product for gradient pull-back.
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs except `safe_logistic`, which
//!   accepts infinities.
//! - Buffer lengths passed to the cumulative-softmax helpers are sized by
//!   the caller from one parameter layout; mismatches are programming
//!   errors and panic.
//!
//! Conventions
//! -----------
//! - Routines operate on `ndarray` views and write into caller-owned
//!   buffers where a vector result is produced inside the objective loop.
//! - This module never logs, performs I/O, or touches global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover tail behavior of the sigmoid,
//!   round trips of every forward/inverse pair, and finite-difference
//!   checks of the derivative helpers.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    LOGIT_EPS, box_tanh, box_tanh_deriv, box_tanh_inv, cumulative_softmax,
    cumulative_softmax_deriv, cumulative_softmax_inv, safe_logistic,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{
        LOGIT_EPS, box_tanh, box_tanh_inv, cumulative_softmax, cumulative_softmax_inv,
        safe_logistic,
    };
}
