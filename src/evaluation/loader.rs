//! Whitespace-delimited numeric tables: the last column is an ordinal label,
//! every other column a feature.
//!
//! Loading follows the classic recipe for ordinal benchmark files: features
//! are mean-centered (by default with one scalar mean over the whole feature
//! matrix) and labels are shifted so the smallest one is zero. Blank lines
//! and lines starting with `#` are skipped.
use crate::evaluation::errors::{EvalError, EvalResult};
use ndarray::{Array2, Axis};
use std::{path::Path, str::FromStr};

/// How features are centered after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Centering {
    /// Subtract one scalar: the mean of every feature value.
    #[default]
    GlobalScalar,
    /// Subtract each column's own mean.
    PerColumn,
    /// Leave features untouched.
    None,
}

impl FromStr for Centering {
    type Err = EvalError;

    /// Accepts `global`, `per-column` and `none` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" | "global-scalar" => Ok(Centering::GlobalScalar),
            "per-column" | "column" => Ok(Centering::PerColumn),
            "none" => Ok(Centering::None),
            _ => Err(EvalError::UnknownCentering { name: s.to_string() }),
        }
    }
}

/// Features and zero-based integer labels of a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub x: Array2<f64>,
    pub y: Vec<i64>,
}

impl Table {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

/// Read and parse the table at `path`.
///
/// # Errors
/// [`EvalError::Io`] if the file cannot be read, otherwise as [`parse_table`].
pub fn load_table<P: AsRef<Path>>(path: P, centering: Centering) -> EvalResult<Table> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| EvalError::Io {
        path: path.display().to_string(),
        text: e.to_string(),
    })?;
    let table = parse_table(&text, centering)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.n_samples(),
        features = table.n_features(),
        "loaded table"
    );
    Ok(table)
}

/// Parse table text, center features and shift labels.
///
/// # Errors
/// - [`EvalError::Parse`] for a non-numeric token.
/// - [`EvalError::TooFewColumns`] for a row with fewer than two columns.
/// - [`EvalError::Ragged`] when a row's width differs from the first row's.
/// - [`EvalError::EmptyTable`] when no data rows remain.
/// - [`EvalError::NonIntegerLabel`] for a fractional or non-finite label.
pub fn parse_table(text: &str, centering: Centering) -> EvalResult<Table> {
    let mut width: Option<usize> = None;
    let mut values: Vec<f64> = Vec::new();
    let mut n_rows = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let start = values.len();
        for (col, token) in line.split_whitespace().enumerate() {
            let v = token.parse::<f64>().map_err(|_| EvalError::Parse {
                line: line_no,
                column: col + 1,
                token: token.to_string(),
            })?;
            values.push(v);
        }
        let found = values.len() - start;
        if found < 2 {
            return Err(EvalError::TooFewColumns { line: line_no, found });
        }
        match width {
            None => width = Some(found),
            Some(expected) if expected != found => {
                return Err(EvalError::Ragged { line: line_no, expected, found });
            }
            Some(_) => {}
        }
        n_rows += 1;
    }

    let width = width.ok_or(EvalError::EmptyTable)?;
    let n_features = width - 1;
    let mut x = Array2::from_shape_fn((n_rows, n_features), |(i, j)| values[i * width + j]);
    let labels: Vec<f64> = (0..n_rows).map(|i| values[i * width + n_features]).collect();

    let min = labels.iter().copied().fold(f64::INFINITY, f64::min);
    let mut y = Vec::with_capacity(n_rows);
    for (row, &v) in labels.iter().enumerate() {
        let shifted = v - min;
        if !shifted.is_finite() || shifted.fract() != 0.0 {
            return Err(EvalError::NonIntegerLabel { row, value: v });
        }
        y.push(shifted as i64);
    }

    center(&mut x, centering);
    Ok(Table { x, y })
}

/// Center `x` in place.
pub fn center(x: &mut Array2<f64>, centering: Centering) {
    if x.is_empty() {
        return;
    }
    match centering {
        Centering::GlobalScalar => {
            let mean = x.sum() / x.len() as f64;
            x.mapv_inplace(|v| v - mean);
        }
        Centering::PerColumn => {
            if let Some(means) = x.mean_axis(Axis(0)) {
                *x -= &means;
            }
        }
        Centering::None => {}
    }
}
