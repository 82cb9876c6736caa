//! Graph algorithms module.
//!
//! This module provides the batch analytics engines:
//! - Weakly connected components (union-find with path halving)
//! - Strongly connected components (iterative two-pass Kosaraju)
//! - Neighborhood similarity (Jaccard, Overlap) over 1-hop or 2-hop pairs
//! - HITS hub/authority scoring with bounded iteration
//! - Seeded uniform random walks with flattened batch output

mod components;
mod hits;
mod random_walk;
mod similarity;

pub use components::ComponentsResult;
pub use hits::{HitsConfig, HitsResult, HitsScore};
pub use random_walk::{RandomWalksResult, WalkConfig};
pub use similarity::{PairScope, SimilarityConfig, SimilarityMetric, SimilarityScore};
