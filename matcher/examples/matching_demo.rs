//! Descriptor Matching Example
//!
//! This example walks through the matching pipeline on synthetic data:
//! 1. Build two descriptor sets where the second is a noisy, shuffled copy
//! 2. Run the brute-force k-NN search
//! 3. Filter with Lowe's ratio test
//! 4. Tighten with cross-check and a distance cap

use bfmatch_core::DescriptorMatrix;
use bfmatch_matcher::{knn_match, ratio_test, BFMatcher, DEFAULT_RATIO};

const DIMS: usize = 32;
const COUNT: usize = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Descriptor Matching Pipeline Example\n");

    let (query, train) = synthetic_pair()?;
    println!(
        "Step 1: {} query and {} train descriptors of width {}\n",
        query.rows(),
        train.rows(),
        train.cols()
    );

    let lists = knn_match(&query, &train, 2)?;
    println!("Step 2: k-NN search produced {} neighbor lists", lists.len());
    if let Some(first) = lists.first() {
        for m in first.iter() {
            println!(
                "  query {} -> train {} (distance {:.3})",
                m.query_idx, m.train_idx, m.distance
            );
        }
    }
    println!();

    let good = ratio_test(&lists, DEFAULT_RATIO)?;
    println!("Step 3: ratio test at {} kept {} matches\n", DEFAULT_RATIO, good.len());

    let strict = BFMatcher::new()
        .with_ratio_test(DEFAULT_RATIO)
        .with_cross_check()
        .with_max_distance(2.0)
        .match_descriptors(&query, &train)?;
    println!("Step 4: cross-check + max distance kept {} matches", strict.len());

    let correct = strict
        .iter()
        .filter(|m| m.train_idx == shuffled(m.query_idx))
        .count();
    println!("  {} of them are true correspondences", correct);

    Ok(())
}

/// Deterministic pseudo-random descriptors; train row `shuffled(i)` is a
/// slightly perturbed copy of query row `i`.
fn synthetic_pair() -> bfmatch_core::Result<(DescriptorMatrix, DescriptorMatrix)> {
    let value = |i: usize, c: usize| ((i * 761 + c * 503) % 1000) as f32 / 100.0;

    let query: Vec<Vec<f32>> = (0..COUNT)
        .map(|i| (0..DIMS).map(|c| value(i, c)).collect())
        .collect();

    let mut train = vec![Vec::new(); COUNT];
    for (i, row) in query.iter().enumerate() {
        train[shuffled(i)] = row
            .iter()
            .enumerate()
            .map(|(c, v)| v + if c % 2 == 0 { 0.05 } else { -0.05 })
            .collect();
    }

    Ok((
        DescriptorMatrix::from_rows(&query)?,
        DescriptorMatrix::from_rows(&train)?,
    ))
}

fn shuffled(i: usize) -> usize {
    // 7 is coprime with COUNT, so this is a permutation
    (i * 7) % COUNT
}
