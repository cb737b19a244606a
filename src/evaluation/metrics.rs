//! Classification scores.
use crate::evaluation::errors::{EvalError, EvalResult};

/// Fraction of positions where `predicted` equals `truth`.
///
/// # Errors
/// - [`EvalError::LengthMismatch`] when the slices differ in length.
/// - [`EvalError::EmptyPredictions`] for empty inputs.
pub fn accuracy<T: PartialEq>(predicted: &[T], truth: &[T]) -> EvalResult<f64> {
    if predicted.len() != truth.len() {
        return Err(EvalError::LengthMismatch { predicted: predicted.len(), expected: truth.len() });
    }
    if truth.is_empty() {
        return Err(EvalError::EmptyPredictions);
    }
    let hits = predicted.iter().zip(truth.iter()).filter(|(p, t)| p == t).count();
    Ok(hits as f64 / truth.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Accuracy counts exact matches and rejects unusable inputs.
    fn accuracy_counts_exact_matches() {
        assert_eq!(accuracy(&[1, 2, 3, 4], &[1, 0, 3, 0]), Ok(0.5));
        assert_eq!(accuracy(&[2.5, 7.0], &[2.5, 7.0]), Ok(1.0));
        assert_eq!(
            accuracy(&[1, 2], &[1]),
            Err(EvalError::LengthMismatch { predicted: 2, expected: 1 })
        );
        assert_eq!(accuracy::<i32>(&[], &[]), Err(EvalError::EmptyPredictions));
    }
}
