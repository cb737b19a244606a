//! Repeated stratified shuffle splits.
//!
//! Each split draws a test set whose class proportions follow the full label
//! set. Per-class test counts are computed once:
//!
//! - `n_test = ceil(test_size · N)`;
//! - class `c` gets `floor(n_test · n_c / N)` test samples, and the
//!   remaining slots go to the classes with the largest fractional parts
//!   (lower rank first on ties);
//! - no class gives up its last sample, so every class is present in every
//!   training set.
//!
//! A single `StdRng` seeded from `seed` drives all splits, so the same
//! configuration and labels always reproduce the same folds. Index lists are
//! returned sorted.
use crate::{
    evaluation::errors::{EvalError, EvalResult},
    ordinal::core::data::LabelEncoding,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

pub const DEFAULT_N_SPLITS: usize = 50;
pub const DEFAULT_TEST_SIZE: f64 = 0.25;

/// Train/test row indices of one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded generator of `n_splits` stratified train/test partitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StratifiedShuffleSplit {
    pub n_splits: usize,
    /// Fraction of samples in each test set, in `(0, 1)`.
    pub test_size: f64,
    pub seed: u64,
}

impl Default for StratifiedShuffleSplit {
    fn default() -> Self {
        Self { n_splits: DEFAULT_N_SPLITS, test_size: DEFAULT_TEST_SIZE, seed: 0 }
    }
}

impl StratifiedShuffleSplit {
    /// # Errors
    /// [`EvalError::InvalidSplit`] for `n_splits == 0` or a `test_size`
    /// outside the open interval `(0, 1)`.
    pub fn new(n_splits: usize, test_size: f64, seed: u64) -> EvalResult<Self> {
        if n_splits == 0 {
            return Err(EvalError::InvalidSplit {
                reason: "number of splits must be greater than zero".to_string(),
            });
        }
        if !(test_size.is_finite() && test_size > 0.0 && test_size < 1.0) {
            return Err(EvalError::InvalidSplit {
                reason: format!("test size must lie strictly between 0 and 1; got {test_size}"),
            });
        }
        Ok(Self { n_splits, test_size, seed })
    }

    /// Generate the folds for labels `y`.
    ///
    /// # Errors
    /// - Label errors from [`LabelEncoding::fit`] (empty, NaN, single class).
    /// - [`EvalError::InvalidSplit`] when the test or training set would be
    ///   smaller than the number of classes.
    pub fn split<L: PartialOrd + Clone>(&self, y: &[L]) -> EvalResult<Vec<Split>> {
        let encoding = LabelEncoding::fit(y)?;
        let n = y.len();
        let n_classes = encoding.n_classes();

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        for (i, &rank) in encoding.ranks.iter().enumerate() {
            groups[rank].push(i);
        }
        let counts: Vec<usize> = groups.iter().map(Vec::len).collect();

        let n_test = (self.test_size * n as f64).ceil() as usize;
        let n_train = n.saturating_sub(n_test);
        if n_test < n_classes || n_train < n_classes {
            return Err(EvalError::InvalidSplit {
                reason: format!(
                    "{n_test} test and {n_train} training samples cannot both cover {n_classes} classes"
                ),
            });
        }
        let allocation = allocate_test_counts(&counts, n_test)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut splits = Vec::with_capacity(self.n_splits);
        for _ in 0..self.n_splits {
            let mut train = Vec::with_capacity(n - n_test);
            let mut test = Vec::with_capacity(n_test);
            for (group, &take) in groups.iter().zip(allocation.iter()) {
                let mut members = group.clone();
                members.shuffle(&mut rng);
                test.extend_from_slice(&members[..take]);
                train.extend_from_slice(&members[take..]);
            }
            train.sort_unstable();
            test.sort_unstable();
            splits.push(Split { train, test });
        }
        Ok(splits)
    }
}

/// Largest-remainder allocation of `n_test` slots over classes of sizes
/// `counts`, leaving at least one sample of every class out of the test set.
///
/// # Errors
/// [`EvalError::InvalidSplit`] when the classes cannot absorb `n_test`
/// slots under that cap.
pub fn allocate_test_counts(counts: &[usize], n_test: usize) -> EvalResult<Vec<usize>> {
    let n: usize = counts.iter().sum();
    let capacity: usize = counts.iter().map(|&c| c.saturating_sub(1)).sum();
    if n == 0 || n_test > capacity {
        return Err(EvalError::InvalidSplit {
            reason: format!(
                "cannot draw {n_test} test samples while keeping one training sample per class"
            ),
        });
    }

    let targets: Vec<f64> = counts.iter().map(|&c| n_test as f64 * c as f64 / n as f64).collect();
    let mut allocation: Vec<usize> = targets
        .iter()
        .zip(counts.iter())
        .map(|(&t, &c)| (t.floor() as usize).min(c.saturating_sub(1)))
        .collect();

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    by_remainder.sort_by(|&a, &b| targets[b].fract().total_cmp(&targets[a].fract()));

    let mut remaining = n_test - allocation.iter().sum::<usize>();
    while remaining > 0 {
        for &c in &by_remainder {
            if remaining == 0 {
                break;
            }
            if allocation[c] + 1 < counts[c] {
                allocation[c] += 1;
                remaining -= 1;
            }
        }
    }
    Ok(allocation)
}
