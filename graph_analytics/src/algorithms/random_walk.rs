//! Seeded uniform random walks.
//!
//! Each seed produces one path: starting at the seed, every step picks a
//! uniformly random out-edge until the requested length is reached or a
//! zero-out-degree vertex ends the walk early. Output is flattened with a
//! per-seed offset table for batch consumption.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{GraphStore, Result};

/// Configuration for random walk sampling.
#[derive(Debug, Clone, Copy)]
pub struct WalkConfig {
    /// Maximum number of edges to traverse per seed.
    pub path_length: usize,
    /// RNG seed; identical seeds reproduce identical walks.
    pub rng_seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            path_length: 10,
            rng_seed: 0,
        }
    }
}

impl WalkConfig {
    #[must_use]
    pub fn new(path_length: usize) -> Self {
        Self {
            path_length,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

/// Flattened batch of random walks, one path per seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomWalksResult {
    /// Concatenated path vertices in original IDs. Every path starts with
    /// its seed; path `i` occupies `vertices[offsets[i]..offsets[i + 1]]`.
    pub vertices: Vec<i64>,
    /// Start index of each path in `vertices`, plus a trailing end index.
    pub offsets: Vec<usize>,
    /// Realized length of each path in edges; may be shorter than the
    /// requested `path_length`, and 0 for zero-out-degree seeds.
    pub lengths: Vec<usize>,
    /// Weights of the traversed edges, flattened the same way; present
    /// only for weighted stores.
    pub weights: Option<Vec<f64>>,
}

impl RandomWalksResult {
    /// Number of paths in the batch.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.lengths.len()
    }

    /// Vertices of path `i`, seed included.
    #[must_use]
    pub fn path(&self, i: usize) -> &[i64] {
        &self.vertices[self.offsets[i]..self.offsets[i + 1]]
    }
}

impl GraphStore {
    /// Run one uniform random walk per seed.
    ///
    /// All seeds are validated up front; the walks themselves cannot
    /// fail. The RNG is seeded from `config.rng_seed`, so results are
    /// reproducible for a fixed store and seed list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::UnknownVertex`] if any seed is absent
    /// from the store.
    #[instrument(skip(self, seeds, config), fields(seed_count = seeds.len(), path_length = config.path_length))]
    pub fn random_walks(&self, seeds: &[i64], config: &WalkConfig) -> Result<RandomWalksResult> {
        let starts: Vec<u32> = seeds
            .iter()
            .map(|&s| self.translate_to_internal(s))
            .collect::<Result<_>>()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let mut vertices = Vec::with_capacity(seeds.len() * (config.path_length + 1));
        let mut offsets = Vec::with_capacity(seeds.len() + 1);
        let mut lengths = Vec::with_capacity(seeds.len());
        let mut weights = self.is_weighted().then(Vec::new);

        for &start in &starts {
            offsets.push(vertices.len());
            vertices.push(self.original_id(start));
            let mut current = start;
            let mut walked = 0;
            for _ in 0..config.path_length {
                let slots = self.out_slots(current);
                if slots.is_empty() {
                    break;
                }
                let slot = rng.random_range(slots);
                let next = self.target_at(slot);
                vertices.push(self.original_id(next));
                if let Some(w) = &mut weights {
                    // Weighted stores always have a weight per slot.
                    if let Some(edge_weight) = self.weight_at(slot) {
                        w.push(edge_weight);
                    }
                }
                current = next;
                walked += 1;
            }
            lengths.push(walked);
        }
        offsets.push(vertices.len());

        Ok(RandomWalksResult {
            vertices,
            offsets,
            lengths,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuildConfig, EdgeRecord, GraphError};

    fn directed(edges: &[(i64, i64)]) -> GraphStore {
        let records: Vec<EdgeRecord> = edges
            .iter()
            .map(|&(s, d)| EdgeRecord::new(s, d))
            .collect();
        GraphStore::build(&records, &BuildConfig::new()).unwrap()
    }

    #[test]
    fn walk_follows_edges() {
        // Deterministic chain: every vertex has exactly one out-edge.
        let graph = directed(&[(1, 2), (2, 3), (3, 4)]);
        let result = graph.random_walks(&[1], &WalkConfig::new(3)).unwrap();
        assert_eq!(result.path(0), &[1, 2, 3, 4]);
        assert_eq!(result.lengths, vec![3]);
    }

    #[test]
    fn dead_end_terminates_early() {
        let graph = directed(&[(1, 2), (2, 3)]);
        let result = graph.random_walks(&[1], &WalkConfig::new(10)).unwrap();
        assert_eq!(result.path(0), &[1, 2, 3]);
        assert_eq!(result.lengths, vec![2]);
    }

    #[test]
    fn zero_out_degree_seed_gets_length_zero() {
        // Vertex 3 has no out-edges; requested length 4.
        let graph = directed(&[(1, 2), (2, 3)]);
        let result = graph.random_walks(&[3], &WalkConfig::new(4)).unwrap();
        assert_eq!(result.lengths, vec![0]);
        assert_eq!(result.path(0), &[3]);
    }

    #[test]
    fn length_never_exceeds_requested() {
        let graph = directed(&[(1, 2), (2, 1), (2, 3), (3, 1)]);
        let result = graph
            .random_walks(&[1, 2, 3], &WalkConfig::new(5).rng_seed(7))
            .unwrap();
        for &len in &result.lengths {
            assert!(len <= 5);
        }
    }

    #[test]
    fn offsets_partition_the_flat_output() {
        let graph = directed(&[(1, 2), (2, 3), (3, 1)]);
        let result = graph
            .random_walks(&[1, 2, 3], &WalkConfig::new(4).rng_seed(3))
            .unwrap();
        assert_eq!(result.offsets.len(), 4);
        assert_eq!(*result.offsets.last().unwrap(), result.vertices.len());
        for i in 0..result.path_count() {
            assert_eq!(result.path(i).len(), result.lengths[i] + 1);
        }
    }

    #[test]
    fn identical_seeds_reproduce_walks() {
        let graph = directed(&[(1, 2), (1, 3), (2, 1), (3, 1), (2, 3), (3, 2)]);
        let config = WalkConfig::new(20).rng_seed(42);
        let a = graph.random_walks(&[1, 2], &config).unwrap();
        let b = graph.random_walks(&[1, 2], &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_seed_is_rejected_before_walking() {
        let graph = directed(&[(1, 2)]);
        let err = graph
            .random_walks(&[1, 99], &WalkConfig::new(2))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownVertex(99));
    }

    #[test]
    fn weighted_store_reports_traversed_weights() {
        let records = [
            EdgeRecord::weighted(1, 2, 0.5),
            EdgeRecord::weighted(2, 3, 2.0),
        ];
        let graph = GraphStore::build(&records, &BuildConfig::new()).unwrap();
        let result = graph.random_walks(&[1], &WalkConfig::new(2)).unwrap();
        assert_eq!(result.weights, Some(vec![0.5, 2.0]));
    }
}
