use crate::{MatchError, Result};
use bfmatch_core::DescriptorMatrix;

/// Fail unless both matrices describe descriptors of the same width.
///
/// A matrix without rows has no descriptors to compare, so it pairs with any width.
pub fn check_dimensions(query: &DescriptorMatrix, train: &DescriptorMatrix) -> Result<()> {
    if query.is_empty() || train.is_empty() {
        return Ok(());
    }

    if query.cols() != train.cols() {
        return Err(MatchError::DimensionMismatch {
            query: query.cols(),
            train: train.cols(),
        });
    }
    Ok(())
}

/// Sum of squared differences, accumulated in `f64`.
#[inline]
pub fn l2_squared(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum()
}

#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    l2_squared(a, b).sqrt()
}

/// Euclidean distance between row `query_idx` of `query` and row `train_idx` of `train`.
///
/// Widths are not re-checked here; run [`check_dimensions`] once per matrix pair.
#[inline]
pub fn euclidean_distance(
    query: &DescriptorMatrix,
    query_idx: usize,
    train: &DescriptorMatrix,
    train_idx: usize,
) -> f64 {
    l2_distance(query.row(query_idx), train.row(train_idx))
}
