//! Parameter layout, starting point and box bounds of the ordinal model.
//!
//! Purpose
//! -------
//! Describe the flat natural-space parameter vector `[w; θ]` (weights
//! followed by one threshold per class) and the quantities built from it
//! before optimization: the starting point and the box bounds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Layout length is `n_features + n_classes`; weights come first.
//! - Bounds are `[-big, big]` for weights and `[lo, hi]` for thresholds;
//!   `big` is always passed in explicitly by the caller.
//!
//! Conventions
//! -----------
//! - Views returned by [`ParamLayout::weights`] / [`ParamLayout::thresholds`]
//!   borrow the caller's vector; no copies are made.
use crate::ordinal::errors::{OrdinalError, OrdinalResult};
use ndarray::{Array1, ArrayView1, s};

/// Shape of the natural-space parameter vector `[w; θ]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    pub n_features: usize,
    pub n_classes: usize,
}

impl ParamLayout {
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        Self { n_features, n_classes }
    }

    /// Total number of natural parameters.
    pub fn len(&self) -> usize {
        self.n_features + self.n_classes
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ensure `params` has this layout's length and only finite entries.
    ///
    /// # Errors
    /// - [`OrdinalError::ParamLengthMismatch`]
    /// - [`OrdinalError::NonFiniteParam`] for the first NaN/±inf entry.
    pub fn validate(&self, params: ArrayView1<f64>) -> OrdinalResult<()> {
        if params.len() != self.len() {
            return Err(OrdinalError::ParamLengthMismatch {
                expected: self.len(),
                actual: params.len(),
            });
        }
        if let Some((index, &value)) = params.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OrdinalError::NonFiniteParam { index, value });
        }
        Ok(())
    }

    /// Weight block `w` of `params`.
    pub fn weights<'a>(&self, params: ArrayView1<'a, f64>) -> ArrayView1<'a, f64> {
        params.slice_move(s![..self.n_features])
    }

    /// Threshold block `θ` of `params`.
    pub fn thresholds<'a>(&self, params: ArrayView1<'a, f64>) -> ArrayView1<'a, f64> {
        params.slice_move(s![self.n_features..])
    }

    /// Concatenate weights and thresholds into one parameter vector.
    pub fn join(&self, weights: ArrayView1<f64>, thresholds: ArrayView1<f64>) -> Array1<f64> {
        weights.iter().chain(thresholds.iter()).copied().collect()
    }

    /// Starting point: every weight `1.0`, thresholds evenly spaced over
    /// `[lo, hi]` (endpoints included).
    pub fn initial_guess(&self, lo: f64, hi: f64) -> Array1<f64> {
        let weights = Array1::from_elem(self.n_features, 1.0);
        let thresholds = Array1::linspace(lo, hi, self.n_classes);
        self.join(weights.view(), thresholds.view())
    }
}

/// Box bounds on the natural parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBounds {
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

impl ParamBounds {
    /// `[-big, big]` on every weight and `[lo, hi]` on every threshold.
    pub fn new(layout: ParamLayout, big: f64, (lo, hi): (f64, f64)) -> Self {
        let lower = layout.join(
            Array1::from_elem(layout.n_features, -big).view(),
            Array1::from_elem(layout.n_classes, lo).view(),
        );
        let upper = layout.join(
            Array1::from_elem(layout.n_features, big).view(),
            Array1::from_elem(layout.n_classes, hi).view(),
        );
        Self { lower, upper }
    }

    /// First entry of `params` outside its bounds, if any.
    ///
    /// # Errors
    /// [`OrdinalError::StartOutsideBounds`] naming the offending index.
    pub fn check(&self, params: ArrayView1<f64>) -> OrdinalResult<()> {
        for (index, ((&value, &lower), &upper)) in
            params.iter().zip(self.lower.iter()).zip(self.upper.iter()).enumerate()
        {
            if value < lower || value > upper {
                return Err(OrdinalError::StartOutsideBounds { index, value, lower, upper });
            }
        }
        Ok(())
    }
}
