// Pedantic lint configuration for graph_analytics
#![allow(clippy::cast_possible_truncation)] // internal IDs are validated to fit u32
#![allow(clippy::cast_precision_loss)] // degrees and counts stay far below 2^52
#![allow(clippy::missing_errors_doc)] // Error conditions are self-evident from Result types
#![allow(clippy::uninlined_format_args)] // Keep format strings readable

//! In-memory graph analytics engine.
//!
//! Builds a compressed sparse row (CSR) adjacency from an edge list, with
//! optional vertex renumbering into a dense internal ID space, and runs
//! batch algorithms over an immutable store:
//!
//! - Weakly and strongly connected components
//! - Neighborhood similarity (Jaccard, Overlap) over 1-hop or 2-hop pairs
//! - HITS hub/authority scoring
//! - Seeded uniform random walks
//!
//! The store is immutable after construction and safe for concurrent reads;
//! algorithms borrow it and keep all working state private to the call.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::instrument;

mod config;
mod error;

pub mod algorithms;


pub use algorithms::{
    ComponentsResult, HitsConfig, HitsResult, HitsScore, PairScope, RandomWalksResult,
    SimilarityConfig, SimilarityMetric, SimilarityScore, WalkConfig,
};
pub use config::BuildConfig;
pub use error::{GraphError, Result};

/// One edge-list record in the caller's original ID space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: i64,
    pub destination: i64,
    pub weight: Option<f64>,
}

impl EdgeRecord {
    #[must_use]
    pub const fn new(source: i64, destination: i64) -> Self {
        Self {
            source,
            destination,
            weight: None,
        }
    }

    #[must_use]
    pub const fn weighted(source: i64, destination: i64, weight: f64) -> Self {
        Self {
            source,
            destination,
            weight: Some(weight),
        }
    }
}

/// Bidirectional vertex ID mapping, scoped to one store.
///
/// Internal IDs are dense in `[0, V)`. Renumbering assigns them in
/// first-seen order over the edge list (source before destination within
/// a record), which is deterministic for a given input.
#[derive(Debug, Clone)]
struct Renumbering {
    to_original: Vec<i64>,
    to_internal: HashMap<i64, u32>,
}

impl Renumbering {
    fn first_seen(edges: &[EdgeRecord]) -> Result<Self> {
        let mut to_original = Vec::new();
        let mut to_internal = HashMap::new();
        for edge in edges {
            for id in [edge.source, edge.destination] {
                if !to_internal.contains_key(&id) {
                    let internal = u32::try_from(to_original.len()).map_err(|_| {
                        GraphError::InvalidInput(
                            "vertex count exceeds 32-bit internal ID space".to_string(),
                        )
                    })?;
                    to_internal.insert(id, internal);
                    to_original.push(id);
                }
            }
        }
        Ok(Self {
            to_original,
            to_internal,
        })
    }

    /// Identity mapping over `[0, max_id]`; IDs not present in the edge
    /// list become isolated vertices.
    fn identity(max_id: i64) -> Result<Self> {
        u32::try_from(max_id).map_err(|_| {
            GraphError::InvalidInput(format!(
                "vertex ID {max_id} exceeds 32-bit internal ID space"
            ))
        })?;
        let to_original: Vec<i64> = (0..=max_id).collect();
        let to_internal = to_original.iter().map(|&id| (id, id as u32)).collect();
        Ok(Self {
            to_original,
            to_internal,
        })
    }

    fn len(&self) -> usize {
        self.to_original.len()
    }

    fn internal(&self, original: i64) -> Option<u32> {
        self.to_internal.get(&original).copied()
    }

    fn original(&self, internal: u32) -> Option<i64> {
        self.to_original.get(internal as usize).copied()
    }
}

/// Immutable in-memory graph: renumbering table plus forward and reverse
/// CSR adjacency with sorted per-vertex neighbor lists.
pub struct GraphStore {
    directed: bool,
    /// Forward CSR: `targets[offsets[v]..offsets[v + 1]]` are the sorted
    /// out-neighbors of internal vertex `v`.
    offsets: Vec<usize>,
    targets: Vec<u32>,
    /// Per-edge weights parallel to `targets`; present only if any input
    /// record carried a weight (missing weights default to 1.0).
    weights: Option<Vec<f64>>,
    /// Reverse CSR for incoming-edge traversal.
    rev_offsets: Vec<usize>,
    rev_targets: Vec<u32>,
    renumbering: Renumbering,
    /// Lazily built two-hop pair cache; write-once.
    two_hop: RwLock<Option<Arc<Vec<(u32, u32)>>>>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("directed", &self.directed)
            .field("vertex_count", &self.vertex_count())
            .field("edge_count", &self.edge_count())
            .finish_non_exhaustive()
    }
}

impl GraphStore {
    /// Build a store from an edge list.
    ///
    /// When `config.renumber` is set, vertices are renumbered into a dense
    /// internal range in first-seen order. When `config.directed` is not
    /// set, the edge set is symmetrized before adjacency construction.
    /// Duplicate edges collapse to a single edge (the smallest weight is
    /// kept), so symmetrization is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidInput`] if the edge list is empty, any
    /// vertex ID is negative, or the vertex set does not fit the 32-bit
    /// internal ID space.
    #[instrument(skip(edges), fields(edge_count = edges.len()))]
    pub fn build(edges: &[EdgeRecord], config: &BuildConfig) -> Result<Self> {
        if edges.is_empty() {
            return Err(GraphError::InvalidInput("edge list is empty".to_string()));
        }
        for edge in edges {
            if edge.source < 0 || edge.destination < 0 {
                return Err(GraphError::InvalidInput(format!(
                    "negative vertex ID in edge ({}, {})",
                    edge.source, edge.destination
                )));
            }
        }

        let renumbering = if config.renumber {
            Renumbering::first_seen(edges)?
        } else {
            let max_id = edges
                .iter()
                .map(|e| e.source.max(e.destination))
                .max()
                .unwrap_or(0);
            Renumbering::identity(max_id)?
        };

        let has_weights = edges.iter().any(|e| e.weight.is_some());

        // Weight bits ride along so the sort stays fully deterministic.
        let mut list: Vec<(u32, u32, u64)> = Vec::with_capacity(if config.directed {
            edges.len()
        } else {
            edges.len() * 2
        });
        for edge in edges {
            let u = renumbering.to_internal[&edge.source];
            let v = renumbering.to_internal[&edge.destination];
            let w = edge.weight.unwrap_or(1.0).to_bits();
            list.push((u, v, w));
            if !config.directed && u != v {
                list.push((v, u, w));
            }
        }
        list.sort_unstable();
        list.dedup_by_key(|e| (e.0, e.1));

        let vertex_count = renumbering.len();
        let mut offsets = vec![0usize; vertex_count + 1];
        for &(u, _, _) in &list {
            offsets[u as usize + 1] += 1;
        }
        for i in 0..vertex_count {
            offsets[i + 1] += offsets[i];
        }
        let targets: Vec<u32> = list.iter().map(|e| e.1).collect();
        let weights =
            has_weights.then(|| list.iter().map(|e| f64::from_bits(e.2)).collect::<Vec<f64>>());

        let mut rev_pairs: Vec<(u32, u32)> = list.iter().map(|e| (e.1, e.0)).collect();
        rev_pairs.sort_unstable();
        let mut rev_offsets = vec![0usize; vertex_count + 1];
        for &(v, _) in &rev_pairs {
            rev_offsets[v as usize + 1] += 1;
        }
        for i in 0..vertex_count {
            rev_offsets[i + 1] += rev_offsets[i];
        }
        let rev_targets: Vec<u32> = rev_pairs.iter().map(|p| p.1).collect();

        Ok(Self {
            directed: config.directed,
            offsets,
            targets,
            weights,
            rev_offsets,
            rev_targets,
            renumbering,
            two_hop: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.renumbering.len()
    }

    /// Number of stored directed adjacency entries. An undirected input
    /// edge contributes two entries.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }

    #[must_use]
    pub fn contains_vertex(&self, original: i64) -> bool {
        self.renumbering.internal(original).is_some()
    }

    /// Iterate over all vertices in the caller's original ID space, in
    /// internal ID order.
    pub fn vertices(&self) -> impl Iterator<Item = i64> + '_ {
        self.renumbering.to_original.iter().copied()
    }

    /// Out-neighbors of a vertex, translated back to original IDs.
    /// Ordered by internal ID, O(degree).
    pub fn neighbors(&self, original: i64) -> Result<Vec<i64>> {
        let v = self.translate_to_internal(original)?;
        Ok(self
            .out_neighbors(v)
            .iter()
            .map(|&n| self.renumbering.to_original[n as usize])
            .collect())
    }

    /// Out-degree (directed) or undirected degree.
    pub fn degree(&self, original: i64) -> Result<usize> {
        let v = self.translate_to_internal(original)?;
        Ok(self.out_neighbors(v).len())
    }

    /// Edge membership test, O(log degree) via binary search over the
    /// sorted neighbor list.
    pub fn has_edge(&self, source: i64, destination: i64) -> Result<bool> {
        let u = self.translate_to_internal(source)?;
        let v = self.translate_to_internal(destination)?;
        Ok(self.out_neighbors(u).binary_search(&v).is_ok())
    }

    /// All pairs `(u, w)` with `u != w` reachable by exactly two hops
    /// through a common intermediate, deduplicated, in original IDs.
    ///
    /// The pair set is computed once and cached for the store's lifetime.
    #[must_use]
    pub fn two_hop_pairs(&self) -> Vec<(i64, i64)> {
        self.two_hop_internal()
            .iter()
            .map(|&(u, w)| {
                (
                    self.renumbering.to_original[u as usize],
                    self.renumbering.to_original[w as usize],
                )
            })
            .collect()
    }

    pub fn translate_to_original(&self, internal: u32) -> Result<i64> {
        self.renumbering
            .original(internal)
            .ok_or(GraphError::UnknownVertex(i64::from(internal)))
    }

    pub fn translate_to_internal(&self, original: i64) -> Result<u32> {
        self.renumbering
            .internal(original)
            .ok_or(GraphError::UnknownVertex(original))
    }

    pub(crate) fn out_neighbors(&self, v: u32) -> &[u32] {
        &self.targets[self.offsets[v as usize]..self.offsets[v as usize + 1]]
    }

    pub(crate) fn in_neighbors(&self, v: u32) -> &[u32] {
        &self.rev_targets[self.rev_offsets[v as usize]..self.rev_offsets[v as usize + 1]]
    }

    /// Slot range of `v`'s out-edges within the flat target/weight arrays.
    pub(crate) fn out_slots(&self, v: u32) -> std::ops::Range<usize> {
        self.offsets[v as usize]..self.offsets[v as usize + 1]
    }

    pub(crate) fn target_at(&self, slot: usize) -> u32 {
        self.targets[slot]
    }

    pub(crate) fn weight_at(&self, slot: usize) -> Option<f64> {
        self.weights.as_ref().map(|w| w[slot])
    }

    pub(crate) fn original_id(&self, internal: u32) -> i64 {
        self.renumbering.to_original[internal as usize]
    }

    pub(crate) fn two_hop_internal(&self) -> Arc<Vec<(u32, u32)>> {
        if let Some(cached) = self.two_hop.read().as_ref() {
            return Arc::clone(cached);
        }
        let mut guard = self.two_hop.write();
        if let Some(cached) = guard.as_ref() {
            return Arc::clone(cached);
        }

        let mut pairs = Vec::new();
        let mut reachable: Vec<u32> = Vec::new();
        for u in 0..self.vertex_count() as u32 {
            reachable.clear();
            for &mid in self.out_neighbors(u) {
                for &w in self.out_neighbors(mid) {
                    if w != u {
                        reachable.push(w);
                    }
                }
            }
            reachable.sort_unstable();
            reachable.dedup();
            pairs.extend(reachable.iter().map(|&w| (u, w)));
        }

        let arc = Arc::new(pairs);
        *guard = Some(Arc::clone(&arc));
        arc
    }
}
