//! Neighborhood similarity scoring.
//!
//! Computes Jaccard and Overlap coefficients over vertex pairs that are
//! either graph-adjacent (1-hop) or share a common intermediate (2-hop).
//! Neighbor-set intersections run as a merge over the store's sorted
//! neighbor lists, O(deg(u) + deg(v)) per pair.

#![allow(clippy::cast_precision_loss)] // degrees are far below 2^52

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{GraphStore, Result};

/// Similarity metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimilarityMetric {
    /// Jaccard coefficient: |N(u) ∩ N(v)| / |N(u) ∪ N(v)|
    Jaccard,
    /// Overlap coefficient: |N(u) ∩ N(v)| / min(|N(u)|, |N(v)|)
    Overlap,
}

/// Which vertex pairs get scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairScope {
    /// Graph-adjacent pairs.
    OneHop,
    /// Pairs connected through a common intermediate
    /// (see [`GraphStore::two_hop_pairs`]).
    TwoHop,
}

/// Configuration for batch similarity scoring.
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    /// Metric to compute.
    pub metric: SimilarityMetric,
    /// Pair enumeration mode.
    pub scope: PairScope,
    /// Collapse each unordered pair to a single (source < destination)
    /// record. Both directions are returned otherwise.
    pub canonical_pairs: bool,
    /// Minimum pair count before scoring runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::Jaccard,
            scope: PairScope::OneHop,
            canonical_pairs: false,
            parallel_threshold: 1024,
        }
    }
}

impl SimilarityConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    #[must_use]
    pub const fn scope(mut self, scope: PairScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn two_hop(mut self) -> Self {
        self.scope = PairScope::TwoHop;
        self
    }

    #[must_use]
    pub const fn canonical_pairs(mut self) -> Self {
        self.canonical_pairs = true;
        self
    }

    #[must_use]
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// One scored vertex pair, in original IDs. Coefficients are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub source: i64,
    pub destination: i64,
    pub score: f64,
}

/// Intersection size of two sorted slices via a two-pointer merge.
fn intersection_size(a: &[u32], b: &[u32]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            },
        }
    }
    count
}

impl GraphStore {
    /// Score every pair in the configured scope.
    ///
    /// Pairs follow the stored adjacency: on an undirected store both
    /// directions of each pair appear unless `canonical_pairs` collapses
    /// them; on a directed store the 1-hop pairs are the directed edges.
    #[must_use]
    #[instrument(skip(self, config), fields(metric = ?config.metric, scope = ?config.scope))]
    pub fn similarity(&self, config: &SimilarityConfig) -> Vec<SimilarityScore> {
        let mut pairs: Vec<(u32, u32)> = match config.scope {
            PairScope::OneHop => {
                let mut out = Vec::with_capacity(self.edge_count());
                for u in 0..self.vertex_count() as u32 {
                    for &v in self.out_neighbors(u) {
                        if u != v {
                            out.push((u, v));
                        }
                    }
                }
                out
            },
            PairScope::TwoHop => self.two_hop_internal().as_ref().clone(),
        };

        if config.canonical_pairs {
            for pair in &mut pairs {
                if pair.0 > pair.1 {
                    *pair = (pair.1, pair.0);
                }
            }
            pairs.sort_unstable();
            pairs.dedup();
        }

        let metric = config.metric;
        let canonical = config.canonical_pairs;
        let score_one = |&(u, v): &(u32, u32)| {
            let mut source = self.original_id(u);
            let mut destination = self.original_id(v);
            // Coefficients are symmetric; canonical form orders the
            // original IDs.
            if canonical && source > destination {
                std::mem::swap(&mut source, &mut destination);
            }
            SimilarityScore {
                source,
                destination,
                score: self.score_pair(u, v, metric),
            }
        };

        if pairs.len() >= config.parallel_threshold {
            pairs.par_iter().map(score_one).collect()
        } else {
            pairs.iter().map(score_one).collect()
        }
    }

    /// Score a single vertex pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::UnknownVertex`] if either endpoint is
    /// absent from the store.
    pub fn similarity_between(&self, a: i64, b: i64, metric: SimilarityMetric) -> Result<f64> {
        let u = self.translate_to_internal(a)?;
        let v = self.translate_to_internal(b)?;
        Ok(self.score_pair(u, v, metric))
    }

    fn score_pair(&self, u: u32, v: u32, metric: SimilarityMetric) -> f64 {
        let neighbors_u = self.out_neighbors(u);
        let neighbors_v = self.out_neighbors(v);
        let intersection = intersection_size(neighbors_u, neighbors_v);
        match metric {
            SimilarityMetric::Jaccard => {
                let union = neighbors_u.len() + neighbors_v.len() - intersection;
                if union == 0 {
                    0.0
                } else {
                    intersection as f64 / union as f64
                }
            },
            SimilarityMetric::Overlap => {
                let smaller = neighbors_u.len().min(neighbors_v.len());
                if smaller == 0 {
                    0.0
                } else {
                    intersection as f64 / smaller as f64
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuildConfig, EdgeRecord};

    fn undirected(edges: &[(i64, i64)]) -> GraphStore {
        let records: Vec<EdgeRecord> = edges
            .iter()
            .map(|&(s, d)| EdgeRecord::new(s, d))
            .collect();
        GraphStore::build(&records, &BuildConfig::new().undirected()).unwrap()
    }

    #[test]
    fn jaccard_partial_overlap() {
        // N(1) = {2, 3}, N(4) = {2}: intersection 1, union 2.
        let graph = undirected(&[(1, 2), (1, 3), (4, 2)]);
        let score = graph
            .similarity_between(1, 4, SimilarityMetric::Jaccard)
            .unwrap();
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn overlap_uses_smaller_degree() {
        // Same graph: overlap = 1 / min(2, 1) = 1.0.
        let graph = undirected(&[(1, 2), (1, 3), (4, 2)]);
        let score = graph
            .similarity_between(1, 4, SimilarityMetric::Overlap)
            .unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn jaccard_never_exceeds_overlap() {
        let graph = undirected(&[(1, 2), (1, 3), (2, 3), (3, 4), (4, 5), (2, 5)]);
        let pairs = graph.two_hop_internal();
        for &(u, v) in pairs.iter() {
            let a = graph.original_id(u);
            let b = graph.original_id(v);
            let jaccard = graph.similarity_between(a, b, SimilarityMetric::Jaccard).unwrap();
            let overlap = graph.similarity_between(a, b, SimilarityMetric::Overlap).unwrap();
            assert!((0.0..=1.0).contains(&jaccard));
            assert!((0.0..=1.0).contains(&overlap));
            assert!(jaccard <= overlap + f64::EPSILON);
        }
    }

    #[test]
    fn one_hop_returns_both_directions() {
        let graph = undirected(&[(1, 2)]);
        let scores = graph.similarity(&SimilarityConfig::new());
        assert_eq!(scores.len(), 2);
        let pairs: Vec<(i64, i64)> = scores.iter().map(|s| (s.source, s.destination)).collect();
        assert!(pairs.contains(&(1, 2)));
        assert!(pairs.contains(&(2, 1)));
    }

    #[test]
    fn canonical_pairs_deduplicate() {
        let graph = undirected(&[(1, 2), (2, 3)]);
        let scores = graph.similarity(&SimilarityConfig::new().canonical_pairs());
        assert_eq!(scores.len(), 2);
        for s in &scores {
            assert!(s.source < s.destination);
        }
    }

    #[test]
    fn two_hop_scope_reaches_non_adjacent_pairs() {
        // Path 1 - 2 - 3: (1, 3) only shows up in two-hop mode.
        let graph = undirected(&[(1, 2), (2, 3)]);
        let scores = graph.similarity(&SimilarityConfig::new().two_hop().canonical_pairs());
        let pair = scores
            .iter()
            .find(|s| s.source == 1 && s.destination == 3)
            .expect("two-hop pair (1, 3)");
        // N(1) = {2}, N(3) = {2}: Jaccard 1.0.
        assert!((pair.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_degree_guard() {
        // Directed 1 -> 2 leaves vertex 2 with no out-neighbors.
        let records = [EdgeRecord::new(1, 2)];
        let graph = GraphStore::build(&records, &BuildConfig::new()).unwrap();
        let score = graph
            .similarity_between(2, 2, SimilarityMetric::Jaccard)
            .unwrap();
        assert!(score.abs() < f64::EPSILON);
        let score = graph
            .similarity_between(2, 2, SimilarityMetric::Overlap)
            .unwrap();
        assert!(score.abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_vertex_is_rejected() {
        let graph = undirected(&[(1, 2)]);
        let err = graph
            .similarity_between(1, 99, SimilarityMetric::Jaccard)
            .unwrap_err();
        assert_eq!(err, crate::GraphError::UnknownVertex(99));
    }

    #[test]
    fn parallel_and_serial_paths_agree() {
        let edges: Vec<(i64, i64)> = (0..50).map(|i| (i, (i + 1) % 50)).collect();
        let graph = undirected(&edges);
        let serial = graph.similarity(&SimilarityConfig::new().parallel_threshold(usize::MAX));
        let mut parallel = graph.similarity(&SimilarityConfig::new().parallel_threshold(1));
        // Rayon preserves order for indexed collects, but don't rely on it.
        parallel.sort_by_key(|s| (s.source, s.destination));
        let mut serial = serial;
        serial.sort_by_key(|s| (s.source, s.destination));
        assert_eq!(serial.len(), parallel.len());
        for (a, b) in serial.iter().zip(parallel.iter()) {
            assert_eq!((a.source, a.destination), (b.source, b.destination));
            assert!((a.score - b.score).abs() < f64::EPSILON);
        }
    }
}
