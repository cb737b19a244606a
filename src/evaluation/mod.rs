//! evaluation — data loading, stratified splitting, a baseline classifier
//! and cross-validation around the ordinal model.
//!
//! Purpose
//! -------
//! Reproduce the classic benchmark run: load a numeric table, draw repeated
//! stratified train/test splits, fit the ordinal model and a multinomial
//! logistic baseline on each training part and compare test accuracy.
//!
//! Key behaviors
//! -------------
//! - [`loader`]: whitespace-delimited tables, label shifting and centering.
//! - [`split`]: seeded [`StratifiedShuffleSplit`] with largest-remainder
//!   class allocation.
//! - [`baseline`]: L2-penalized [`MultinomialLogit`] fitted through the
//!   same optimizer layer.
//! - [`metrics`]: accuracy.
//! - [`cross_validation`]: per-fold fault isolation and optional rayon
//!   parallelism across folds.
//!
//! Conventions
//! -----------
//! - Errors are [`EvalError`]; core and optimizer failures are wrapped, not
//!   flattened.
//! - Fold-level failures are data ([`FoldReport`] fields), never early
//!   returns.

pub mod baseline;
pub mod cross_validation;
pub mod errors;
pub mod loader;
pub mod metrics;
pub mod split;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::baseline::{BaselineFit, BaselineOptions, MultinomialLogit};
pub use self::cross_validation::{CvOptions, CvReport, FoldReport, FoldScore, cross_validate};
pub use self::errors::{EvalError, EvalResult};
pub use self::loader::{Centering, Table, load_table, parse_table};
pub use self::metrics::accuracy;
pub use self::split::{Split, StratifiedShuffleSplit};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::cross_validation::{CvOptions, CvReport, cross_validate};
    pub use super::errors::{EvalError, EvalResult};
    pub use super::loader::{Centering, load_table};
    pub use super::split::StratifiedShuffleSplit;
}
