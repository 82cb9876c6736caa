//! HITS hub/authority scoring.
//!
//! Iterative fixed-point computation: each round pulls authority scores
//! from in-edges, hub scores from out-edges, L2-normalizes both vectors,
//! and stops once the L1 delta of the authority vector drops below the
//! configured tolerance. Hitting the iteration budget is a soft status,
//! not an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{GraphError, GraphStore, Result};

/// Configuration for HITS computation.
#[derive(Debug, Clone, Copy)]
pub struct HitsConfig {
    /// Iteration budget.
    pub max_iter: usize,
    /// Convergence tolerance on the L1 authority delta.
    pub tolerance: f64,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tolerance: 1e-5,
        }
    }
}

impl HitsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[must_use]
    pub const fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Hub and authority scores for one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitsScore {
    pub vertex: i64,
    pub hub: f64,
    pub authority: f64,
}

/// Result of a HITS run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsResult {
    /// Per-vertex scores in internal ID order, both in [0, 1] after L2
    /// normalization.
    pub scores: Vec<HitsScore>,
    /// Whether the authority vector converged within the iteration
    /// budget. Scores are valid (if imprecise) either way.
    pub converged: bool,
    /// Iterations actually run.
    pub iterations: usize,
}

impl HitsResult {
    #[must_use]
    pub fn score_of(&self, vertex: i64) -> Option<&HitsScore> {
        self.scores.iter().find(|s| s.vertex == vertex)
    }

    /// Vertices with the highest authority, best first.
    #[must_use]
    pub fn top_authorities(&self, limit: usize) -> Vec<&HitsScore> {
        let mut ranked: Vec<&HitsScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            b.authority
                .partial_cmp(&a.authority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }

    /// Vertices with the highest hub score, best first.
    #[must_use]
    pub fn top_hubs(&self, limit: usize) -> Vec<&HitsScore> {
        let mut ranked: Vec<&HitsScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            b.hub
                .partial_cmp(&a.hub)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }
}

fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}

impl GraphStore {
    /// Run HITS over the full graph.
    ///
    /// Authority scores accumulate from in-edges, hub scores from
    /// out-edges; both vectors are L2-normalized after each phase so the
    /// initial constant is irrelevant to the converged direction.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyGraph`] if the store has no vertices.
    #[instrument(skip(self, config), fields(max_iter = config.max_iter))]
    pub fn hits(&self, config: &HitsConfig) -> Result<HitsResult> {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return Err(GraphError::EmptyGraph);
        }

        let mut hub = vec![1.0f64; vertex_count];
        let mut authority = vec![1.0f64; vertex_count];
        let mut previous_authority = vec![0.0f64; vertex_count];

        let mut converged = false;
        let mut iterations = 0;
        for iteration in 0..config.max_iter {
            iterations = iteration + 1;
            previous_authority.copy_from_slice(&authority);

            // Authority phase: pull hub mass along in-edges.
            for v in 0..vertex_count as u32 {
                authority[v as usize] = self
                    .in_neighbors(v)
                    .iter()
                    .map(|&u| hub[u as usize])
                    .sum();
            }
            l2_normalize(&mut authority);

            // Hub phase: pull authority mass along out-edges.
            for v in 0..vertex_count as u32 {
                hub[v as usize] = self
                    .out_neighbors(v)
                    .iter()
                    .map(|&w| authority[w as usize])
                    .sum();
            }
            l2_normalize(&mut hub);

            let delta: f64 = authority
                .iter()
                .zip(previous_authority.iter())
                .map(|(a, p)| (a - p).abs())
                .sum();
            debug!(iteration, delta, "hits iteration");
            if delta < config.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                max_iter = config.max_iter,
                "hits did not converge within iteration budget"
            );
        }

        let scores = (0..vertex_count as u32)
            .map(|v| HitsScore {
                vertex: self.original_id(v),
                hub: hub[v as usize],
                authority: authority[v as usize],
            })
            .collect();

        Ok(HitsResult {
            scores,
            converged,
            iterations,
        })
    }
}
