//! Ordinal data containers: label encoding and label-sorted training data.
//!
//! Purpose
//! -------
//! Turn a caller's feature matrix and arbitrary totally-ordered labels into
//! the representation the likelihood works on: samples sorted by label,
//! labels replaced by dense zero-based ranks, and the permutations needed to
//! restore the caller's sample order afterwards.
//!
//! Key behaviors
//! -------------
//! - [`LabelEncoding`] learns the sorted distinct classes of a label slice,
//!   assigns each sample its rank, and records the stable sorting
//!   permutation together with its inverse.
//! - [`OrdinalData`] validates the feature matrix against the labels and
//!   stores rows and ranks in label-sorted order.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one sample, at least one feature, all features finite.
//! - Every label is comparable with itself (NaN labels are rejected).
//! - At least two distinct classes.
//! - `order[s]` is the original index of the sample at sorted position `s`;
//!   `inverse[i]` is the sorted position of original sample `i`.
//!
//! Conventions
//! -----------
//! - Sorting is stable, so samples sharing a label keep their relative input
//!   order.
//! - Ranks are `0..n_classes` in increasing label order.
//!
//! Testing notes
//! -------------
//! - Unit tests cover encoding of unsorted/duplicated labels, the
//!   permutation round trip, and every validation failure of
//!   [`OrdinalData::new`].
use crate::ordinal::errors::{OrdinalError, OrdinalResult};
use ndarray::{Array2, ArrayView2, Axis};
use std::cmp::Ordering;

/// Dense rank encoding of ordinal labels plus the label-sorting permutation.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoding<L> {
    /// Distinct labels in increasing order; `classes[r]` is the label of rank `r`.
    pub classes: Vec<L>,
    /// Rank of every sample, in original sample order.
    pub ranks: Vec<usize>,
    /// Stable sorting permutation: sorted position → original index.
    pub order: Vec<usize>,
    /// Inverse permutation: original index → sorted position.
    pub inverse: Vec<usize>,
}

impl<L: PartialOrd + Clone> LabelEncoding<L> {
    /// Learn the encoding of `labels`.
    ///
    /// # Errors
    /// - [`OrdinalError::EmptyInput`] for an empty slice.
    /// - [`OrdinalError::IncomparableLabel`] for a label that does not
    ///   compare equal to itself (e.g. NaN).
    /// - [`OrdinalError::TooFewClasses`] when fewer than two distinct labels
    ///   are present.
    pub fn fit(labels: &[L]) -> OrdinalResult<Self> {
        if labels.is_empty() {
            return Err(OrdinalError::EmptyInput);
        }
        if let Some(index) =
            labels.iter().position(|l| l.partial_cmp(l) != Some(Ordering::Equal))
        {
            return Err(OrdinalError::IncomparableLabel { index });
        }

        let mut order: Vec<usize> = (0..labels.len()).collect();
        order.sort_by(|&a, &b| labels[a].partial_cmp(&labels[b]).unwrap_or(Ordering::Equal));

        let mut classes: Vec<L> = Vec::new();
        let mut sorted_ranks = Vec::with_capacity(labels.len());
        for &idx in &order {
            let label = &labels[idx];
            let is_new = classes.last().is_none_or(|last| last.partial_cmp(label) != Some(Ordering::Equal));
            if is_new {
                classes.push(label.clone());
            }
            sorted_ranks.push(classes.len() - 1);
        }
        if classes.len() < 2 {
            return Err(OrdinalError::TooFewClasses { found: classes.len() });
        }

        let mut inverse = vec![0; order.len()];
        let mut ranks = vec![0; order.len()];
        for (pos, &idx) in order.iter().enumerate() {
            inverse[idx] = pos;
            ranks[idx] = sorted_ranks[pos];
        }
        Ok(Self { classes, ranks, order, inverse })
    }

    /// Number of distinct classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Rank of `label`, if it is one of the learned classes.
    pub fn encode(&self, label: &L) -> Option<usize> {
        self.classes.iter().position(|c| c.partial_cmp(label) == Some(Ordering::Equal))
    }

    /// Label of `rank`, if in range.
    pub fn decode(&self, rank: usize) -> Option<&L> {
        self.classes.get(rank)
    }

    /// Decode a slice of ranks back into labels.
    ///
    /// # Errors
    /// [`OrdinalError::RankOutOfRange`] for the first rank outside
    /// `0..n_classes`.
    pub fn decode_all(&self, ranks: &[usize]) -> OrdinalResult<Vec<L>> {
        ranks
            .iter()
            .enumerate()
            .map(|(index, &rank)| {
                self.decode(rank).cloned().ok_or(OrdinalError::RankOutOfRange {
                    index,
                    rank,
                    n_classes: self.n_classes(),
                })
            })
            .collect()
    }
}

/// `OrdinalData` — label-sorted features and ranks ready for the likelihood.
///
/// Fields
/// ------
/// - `x`: `Array2<f64>`, rows permuted into label order.
/// - `ranks`: class rank of each sorted row.
/// - `n_classes`: number of distinct classes `K`.
/// - `order` / `inverse`: permutations copied from the [`LabelEncoding`].
///
/// Invariants
/// ----------
/// - `x.nrows() == ranks.len() == order.len() == inverse.len() > 0`.
/// - `ranks` is non-decreasing and every value is `< n_classes`.
/// - All entries of `x` are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalData {
    pub x: Array2<f64>,
    pub ranks: Vec<usize>,
    pub n_classes: usize,
    pub order: Vec<usize>,
    pub inverse: Vec<usize>,
}

impl OrdinalData {
    /// Validate `x` against `encoding` and sort its rows by label.
    ///
    /// # Errors
    /// - [`OrdinalError::EmptyInput`] when `x` has no rows.
    /// - [`OrdinalError::NoFeatures`] when `x` has no columns.
    /// - [`OrdinalError::ShapeMismatch`] when row and label counts differ.
    /// - [`OrdinalError::NonFiniteFeature`] for the first NaN/±inf entry, in
    ///   original coordinates.
    pub fn new<L>(x: ArrayView2<f64>, encoding: &LabelEncoding<L>) -> OrdinalResult<Self> {
        if x.nrows() == 0 {
            return Err(OrdinalError::EmptyInput);
        }
        if x.ncols() == 0 {
            return Err(OrdinalError::NoFeatures);
        }
        if x.nrows() != encoding.ranks.len() {
            return Err(OrdinalError::ShapeMismatch {
                rows: x.nrows(),
                labels: encoding.ranks.len(),
            });
        }
        if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(OrdinalError::NonFiniteFeature { row, col, value });
        }

        let x_sorted = x.select(Axis(0), &encoding.order);
        let ranks = encoding.order.iter().map(|&i| encoding.ranks[i]).collect();
        Ok(Self {
            x: x_sorted,
            ranks,
            n_classes: encoding.classes.len(),
            order: encoding.order.clone(),
            inverse: encoding.inverse.clone(),
        })
    }

    /// Encode `labels` and build the sorted data in one step.
    pub fn from_labels<L: PartialOrd + Clone>(
        x: ArrayView2<f64>, labels: &[L],
    ) -> OrdinalResult<(Self, LabelEncoding<L>)> {
        if x.nrows() != labels.len() {
            return Err(OrdinalError::ShapeMismatch { rows: x.nrows(), labels: labels.len() });
        }
        let encoding = LabelEncoding::fit(labels)?;
        let data = Self::new(x, &encoding)?;
        Ok((data, encoding))
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Put per-sample values computed in sorted order back into the
    /// caller's original sample order.
    pub fn unsort<T: Clone>(&self, sorted: &[T]) -> Vec<T> {
        self.inverse.iter().map(|&pos| sorted[pos].clone()).collect()
    }
}
