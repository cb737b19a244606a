//! models — the user-facing ordinal logistic regression model.
//!
//! [`OrdinalLogitModel`] implements
//! [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood) in
//! the solver space of [`FeasibleMap`](crate::ordinal::core::FeasibleMap) and
//! provides `fit`, `predict` and `predict_labels`. A successful fit is
//! summarised in an [`OrdinalFit`].

pub mod ordinal_logit;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ordinal_logit::{OrdinalFit, OrdinalLogitModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_ordinal::ordinal::models::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::ordinal_logit::{OrdinalFit, OrdinalLogitModel};
}
