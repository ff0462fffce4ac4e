use bfmatch_core::DescriptorMatrix;
use bfmatch_matcher::{knn_match, knn_match_in_pool, BFMatcher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPoolBuilder;

fn random_descriptors(seed: u64, rows: usize, cols: usize) -> DescriptorMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    // coarse values give plenty of distance ties
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(0..4u8) as f32)
        .collect();
    DescriptorMatrix::new(data, cols).unwrap()
}

#[test]
fn test_custom_pool_execution() {
    // Create a strict pool with 1 thread to verify it works even under constraints
    let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();

    let query = random_descriptors(1, 64, 8);
    let train = random_descriptors(2, 96, 8);

    let in_pool = knn_match_in_pool(&query, &train, 2, Some(&pool)).unwrap();
    assert_eq!(in_pool.len(), 64);
    assert!(in_pool.iter().all(|l| l.len() == 2));
}

#[test]
fn test_results_do_not_depend_on_thread_count() {
    let query = random_descriptors(3, 200, 6);
    let train = random_descriptors(4, 150, 6);

    let reference = knn_match(&query, &train, 4).unwrap();

    for threads in [1, 2, 4] {
        let pool = ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        let lists = knn_match_in_pool(&query, &train, 4, Some(&pool)).unwrap();
        assert_eq!(lists, reference, "{} threads", threads);
    }
}

#[test]
fn test_matcher_in_pool_with_cross_check() {
    let pool = ThreadPoolBuilder::new().num_threads(2).build().unwrap();
    let query = random_descriptors(5, 80, 12);
    let train = random_descriptors(6, 80, 12);

    let matcher = BFMatcher::new().with_ratio_test(0.8).with_cross_check();
    let pooled = matcher
        .match_descriptors_in_pool(&query, &train, Some(&pool))
        .unwrap();
    let global = matcher.match_descriptors(&query, &train).unwrap();
    assert_eq!(pooled, global);
}
