use serde::{Deserialize, Serialize};

/// A candidate correspondence between query row `query_idx` and train row `train_idx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: f64,
}

impl FeatureMatch {
    pub fn new(query_idx: usize, train_idx: usize, distance: f64) -> Self {
        Self {
            query_idx,
            train_idx,
            distance,
        }
    }
}

/// The nearest train rows of one query row, closest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborList {
    query_idx: usize,
    neighbors: Vec<FeatureMatch>,
}

impl NeighborList {
    /// Callers must pass neighbors sorted by ascending distance, all for `query_idx`.
    pub fn new(query_idx: usize, neighbors: Vec<FeatureMatch>) -> Self {
        debug_assert!(neighbors.iter().all(|m| m.query_idx == query_idx));
        debug_assert!(neighbors
            .windows(2)
            .all(|w| w[0].distance.total_cmp(&w[1].distance).is_le()));
        Self {
            query_idx,
            neighbors,
        }
    }

    pub fn empty(query_idx: usize) -> Self {
        Self {
            query_idx,
            neighbors: Vec::new(),
        }
    }

    pub fn query_idx(&self) -> usize {
        self.query_idx
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn best(&self) -> Option<&FeatureMatch> {
        self.neighbors.first()
    }

    pub fn second(&self) -> Option<&FeatureMatch> {
        self.neighbors.get(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMatch> {
        self.neighbors.iter()
    }

    pub fn as_slice(&self) -> &[FeatureMatch] {
        &self.neighbors
    }
}

/// Accepted matches, ordered by query index with at most one entry per query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matches {
    pub matches: Vec<FeatureMatch>,
}

impl Matches {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, m: FeatureMatch) {
        self.matches.push(m);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMatch> {
        self.matches.iter()
    }

    pub fn filter_by_distance(&mut self, max_distance: f64) {
        self.matches.retain(|m| m.distance <= max_distance);
    }

    pub fn query_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().map(|m| m.query_idx)
    }

    pub fn train_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().map(|m| m.train_idx)
    }
}

impl From<Vec<FeatureMatch>> for Matches {
    fn from(matches: Vec<FeatureMatch>) -> Self {
        Self { matches }
    }
}

impl IntoIterator for Matches {
    type Item = FeatureMatch;
    type IntoIter = std::vec::IntoIter<FeatureMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}
