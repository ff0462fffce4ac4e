use crate::knn::{knn_match_in_pool, nearest_neighbors, DEFAULT_K};
use crate::ratio::{ratio_test, validate_ratio};
use crate::{MatchError, Result};
use bfmatch_core::{DescriptorMatrix, FeatureMatch, Matches, NeighborList};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

/// Settings for [`BFMatcher`]. Missing fields fall back to [`MatcherConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Neighbors retained per query row.
    pub k: usize,
    /// Lowe's ratio threshold; `None` disables the ratio test.
    pub ratio: Option<f64>,
    /// Keep only mutual nearest neighbors.
    pub cross_check: bool,
    /// Drop accepted matches farther than this.
    pub max_distance: Option<f64>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            ratio: None,
            cross_check: false,
            max_distance: None,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(MatchError::InvalidArgument("k must be at least 1".into()));
        }

        if let Some(ratio) = self.ratio {
            validate_ratio(ratio)?;
            if self.k < 2 {
                return Err(MatchError::InvalidArgument(format!(
                    "ratio test needs k >= 2, got k={}",
                    self.k
                )));
            }
        }

        if let Some(max) = self.max_distance {
            if !max.is_finite() || max < 0.0 {
                return Err(MatchError::InvalidArgument(format!(
                    "max distance must be finite and >= 0, got {}",
                    max
                )));
            }
        }

        Ok(())
    }
}

/// Brute-force Euclidean descriptor matcher.
#[derive(Debug, Clone, Default)]
pub struct BFMatcher {
    config: MatcherConfig,
}

impl BFMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    pub fn with_ratio_test(mut self, ratio: f64) -> Self {
        self.config.ratio = Some(ratio);
        self
    }

    pub fn with_cross_check(mut self) -> Self {
        self.config.cross_check = true;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.config.max_distance = Some(max_distance);
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Raw k-NN lists using the configured `k`.
    pub fn knn_match(
        &self,
        query: &DescriptorMatrix,
        train: &DescriptorMatrix,
    ) -> Result<Vec<NeighborList>> {
        knn_match_in_pool(query, train, self.config.k, None)
    }

    pub fn match_descriptors(
        &self,
        query: &DescriptorMatrix,
        train: &DescriptorMatrix,
    ) -> Result<Matches> {
        self.match_descriptors_in_pool(query, train, None)
    }

    /// Full pipeline: k-NN search, then the ratio test (or plain nearest
    /// neighbor when disabled), cross-check and distance cap.
    pub fn match_descriptors_in_pool(
        &self,
        query: &DescriptorMatrix,
        train: &DescriptorMatrix,
        pool: Option<&ThreadPool>,
    ) -> Result<Matches> {
        self.config.validate()?;

        let lists = knn_match_in_pool(query, train, self.config.k, pool)?;

        let mut matches = match self.config.ratio {
            Some(ratio) => ratio_test(&lists, ratio)?,
            None => lists
                .iter()
                .filter_map(|l| l.best().copied())
                .collect::<Vec<_>>()
                .into(),
        };

        if self.config.cross_check {
            matches = match pool {
                Some(p) => p.install(|| cross_check(query, train, matches)),
                None => cross_check(query, train, matches),
            };
        }

        if let Some(max) = self.config.max_distance {
            matches.filter_by_distance(max);
        }

        Ok(matches)
    }
}

/// Keep `(q, t)` only when `q` is also the nearest query row of train row `t`.
fn cross_check(query: &DescriptorMatrix, train: &DescriptorMatrix, matches: Matches) -> Matches {
    #[cfg(feature = "tracing")]
    let before = matches.len();

    let kept: Vec<FeatureMatch> = matches
        .matches
        .into_par_iter()
        .filter(|m| {
            nearest_neighbors(train, m.train_idx, query, 1)
                .best()
                .map(|reverse| reverse.train_idx == m.query_idx)
                .unwrap_or(false)
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::trace!("cross-check rejected {} of {} matches", before - kept.len(), before);

    kept.into()
}

/// Match with the default `k` and an optional ratio test.
pub fn match_descriptors(
    query: &DescriptorMatrix,
    train: &DescriptorMatrix,
    ratio_threshold: Option<f64>,
) -> Result<Matches> {
    let mut matcher = BFMatcher::new();

    if let Some(threshold) = ratio_threshold {
        matcher = matcher.with_ratio_test(threshold);
    }

    matcher.match_descriptors(query, train)
}
