pub use bfmatch_core as core;
pub use bfmatch_matcher as matcher;

pub use bfmatch_core::{DescriptorMatrix, FeatureMatch, Matches, NeighborList};
pub use bfmatch_matcher::{
    knn_match, ratio_test, BFMatcher, MatchError, MatcherConfig, DEFAULT_K, DEFAULT_RATIO,
};

/// Initialize a single global Rayon thread pool for the matchers.
///
/// Call this once at application startup before matching large descriptor sets.
/// Repeated calls are idempotent and return the first initialization result.
///
/// Priority order:
/// 1. explicit `num_threads`
/// 2. `BFMATCH_CPU_THREADS` env var
/// 3. Rayon default
pub fn init_thread_pool(num_threads: Option<usize>) -> Result<(), String> {
    bfmatch_core::init_global_thread_pool(num_threads)
}
