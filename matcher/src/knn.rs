//! Exhaustive k-nearest-neighbor search over descriptor rows.
//!
//! Every query row is compared against every train row. Query rows are
//! independent, so the scan is a parallel map over query rows whose results
//! are collected back in query order.

use crate::distance::{check_dimensions, euclidean_distance};
use crate::{MatchError, Result};
use bfmatch_core::{DescriptorMatrix, FeatureMatch, NeighborList};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::cmp::Ordering;

pub const DEFAULT_K: usize = 2;

/// Largest `k` served by the insertion buffer; larger values sort every candidate.
pub const SMALL_K_LIMIT: usize = 16;

/// Find the `k` nearest train rows for every query row.
///
/// Returns one [`NeighborList`] per query row, in query order, each holding
/// `min(k, train.rows())` matches sorted by ascending distance. Candidates at
/// equal distance keep ascending train index order.
pub fn knn_match(
    query: &DescriptorMatrix,
    train: &DescriptorMatrix,
    k: usize,
) -> Result<Vec<NeighborList>> {
    knn_match_in_pool(query, train, k, None)
}

/// Same as [`knn_match`], running inside `pool` when one is given.
pub fn knn_match_in_pool(
    query: &DescriptorMatrix,
    train: &DescriptorMatrix,
    k: usize,
    pool: Option<&ThreadPool>,
) -> Result<Vec<NeighborList>> {
    validate_k(k)?;
    check_dimensions(query, train)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "knn search: {} query rows, {} train rows, {} dims, k={}",
        query.rows(),
        train.rows(),
        query.cols(),
        k
    );

    let run = || {
        (0..query.rows())
            .into_par_iter()
            .map(|query_idx| nearest_neighbors(query, query_idx, train, k))
            .collect::<Vec<_>>()
    };

    let lists = if let Some(p) = pool { p.install(run) } else { run() };
    Ok(lists)
}

fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(MatchError::InvalidArgument("k must be at least 1".into()));
    }
    Ok(())
}

/// Neighbors of a single query row. Assumes widths were already checked.
pub(crate) fn nearest_neighbors(
    query: &DescriptorMatrix,
    query_idx: usize,
    train: &DescriptorMatrix,
    k: usize,
) -> NeighborList {
    let keep = k.min(train.rows());
    if keep == 0 {
        return NeighborList::empty(query_idx);
    }

    let neighbors = if k <= SMALL_K_LIMIT {
        bounded_select(query, query_idx, train, keep)
    } else {
        sorted_select(query, query_idx, train, keep)
    };

    NeighborList::new(query_idx, neighbors)
}

/// Keeps a sorted buffer of at most `keep` candidates. New candidates are
/// inserted after any of equal distance, which matches a stable sort.
fn bounded_select(
    query: &DescriptorMatrix,
    query_idx: usize,
    train: &DescriptorMatrix,
    keep: usize,
) -> Vec<FeatureMatch> {
    let mut best: Vec<FeatureMatch> = Vec::with_capacity(keep + 1);

    for train_idx in 0..train.rows() {
        let distance = euclidean_distance(query, query_idx, train, train_idx);

        if best.len() == keep {
            if let Some(worst) = best.last() {
                if distance.total_cmp(&worst.distance) != Ordering::Less {
                    continue;
                }
            }
        }

        let pos = best.partition_point(|m| m.distance.total_cmp(&distance) != Ordering::Greater);
        best.insert(pos, FeatureMatch::new(query_idx, train_idx, distance));
        best.truncate(keep);
    }

    best
}

fn sorted_select(
    query: &DescriptorMatrix,
    query_idx: usize,
    train: &DescriptorMatrix,
    keep: usize,
) -> Vec<FeatureMatch> {
    let mut candidates: Vec<FeatureMatch> = (0..train.rows())
        .map(|train_idx| {
            FeatureMatch::new(
                query_idx,
                train_idx,
                euclidean_distance(query, query_idx, train, train_idx),
            )
        })
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate(keep);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn matrix(rows: &[Vec<f32>]) -> DescriptorMatrix {
        DescriptorMatrix::from_rows(rows).unwrap()
    }

    /// Small integer coordinates so that equal distances are common.
    fn tie_heavy(rng: &mut StdRng, rows: usize, cols: usize) -> DescriptorMatrix {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(0..3u8) as f32)
            .collect();
        DescriptorMatrix::new(data, cols).unwrap()
    }

    #[test]
    fn nearest_first() {
        let query = matrix(&[vec![0.0, 0.0]]);
        let train = matrix(&[vec![3.0, 4.0], vec![0.0, 0.0]]);
        let lists = knn_match(&query, &train, 2).unwrap();
        assert_eq!(lists.len(), 1);
        let got: Vec<(usize, f64)> = lists[0]
            .iter()
            .map(|m| (m.train_idx, m.distance))
            .collect();
        assert_eq!(got, vec![(1, 0.0), (0, 5.0)]);
    }

    #[test]
    fn ties_keep_train_order() {
        let query = matrix(&[vec![0.0, 0.0]]);
        let train = matrix(&[
            vec![0.0, 2.0],
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![0.0, 1.0],
        ]);
        let lists = knn_match(&query, &train, 3).unwrap();
        let order: Vec<usize> = lists[0].iter().map(|m| m.train_idx).collect();
        assert_eq!(order, vec![1, 3, 0]);
    }

    #[test]
    fn zero_k_is_rejected() {
        let query = matrix(&[vec![0.0]]);
        let err = knn_match(&query, &query, 0).unwrap_err();
        assert!(matches!(err, MatchError::InvalidArgument(_)));
    }

    #[test]
    fn zero_k_is_rejected_before_width_check() {
        let query = DescriptorMatrix::empty(4);
        let train = DescriptorMatrix::empty(8);
        let err = knn_match(&query, &train, 0).unwrap_err();
        assert!(matches!(err, MatchError::InvalidArgument(_)));
    }

    #[test]
    fn bounded_and_sorted_selection_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let query = tie_heavy(&mut rng, 12, 3);
        let train = tie_heavy(&mut rng, 40, 3);

        for keep in 1..=train.rows() {
            for i in 0..query.rows() {
                let a = bounded_select(&query, i, &train, keep);
                let b = sorted_select(&query, i, &train, keep);
                assert_eq!(a, b, "query {} keep {}", i, keep);
            }
        }
    }

    #[test]
    fn large_k_uses_full_sort() {
        let mut rng = StdRng::seed_from_u64(11);
        let query = tie_heavy(&mut rng, 5, 4);
        let train = tie_heavy(&mut rng, 30, 4);
        let k = SMALL_K_LIMIT + 4;

        let lists = knn_match(&query, &train, k).unwrap();
        for list in &lists {
            assert_eq!(list.len(), k);
            assert!(list
                .as_slice()
                .windows(2)
                .all(|w| w[0].distance <= w[1].distance));
        }
    }
}
