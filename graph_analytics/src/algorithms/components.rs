//! Connected component labeling.
//!
//! Weak components treat every edge as undirected and are computed with a
//! union-find over the adjacency; strong components use an iterative
//! two-pass Kosaraju traversal (forward finish order, then reverse-graph
//! collection). Both label every component with the smallest internal
//! vertex ID it contains, translated to original IDs at the boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::GraphStore;

/// Result of a component labeling run (weak or strong).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentsResult {
    /// Maps each vertex to its component label. Both sides are original
    /// IDs; the label is the component member with the smallest internal
    /// ID.
    pub labels: HashMap<i64, i64>,
    /// Number of components.
    pub component_count: usize,
    /// Members of each component, grouped by label in internal ID order.
    pub members: Vec<Vec<i64>>,
}

impl ComponentsResult {
    #[must_use]
    pub fn label_of(&self, vertex: i64) -> Option<i64> {
        self.labels.get(&vertex).copied()
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count == 1
    }

    #[must_use]
    pub fn largest_component(&self) -> Option<&[i64]> {
        self.members
            .iter()
            .max_by_key(|m| m.len())
            .map(Vec::as_slice)
    }

    /// Component indices with sizes, largest first.
    #[must_use]
    pub fn components_by_size(&self) -> Vec<(usize, usize)> {
        let mut sizes: Vec<_> = self
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| (i, m.len()))
            .collect();
        sizes.sort_by(|a, b| b.1.cmp(&a.1));
        sizes
    }
}

/// Union-find over internal vertex IDs with path halving.
///
/// Unions always attach the larger root under the smaller one, so the
/// root of every tree is the smallest internal ID in its component.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count as u32).collect(),
        }
    }

    fn find(&mut self, mut v: u32) -> u32 {
        while self.parent[v as usize] != v {
            let grandparent = self.parent[self.parent[v as usize] as usize];
            self.parent[v as usize] = grandparent;
            v = grandparent;
        }
        v
    }

    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        if root_a < root_b {
            self.parent[root_b as usize] = root_a;
        } else {
            self.parent[root_a as usize] = root_b;
        }
    }
}

impl GraphStore {
    /// Compute weakly connected components.
    ///
    /// Edge direction is ignored; an isolated vertex forms its own
    /// singleton component. Time complexity: near O(V + E).
    #[must_use]
    #[instrument(skip(self))]
    pub fn weakly_connected_components(&self) -> ComponentsResult {
        let vertex_count = self.vertex_count();
        let mut dsu = UnionFind::new(vertex_count);
        for u in 0..vertex_count as u32 {
            for &v in self.out_neighbors(u) {
                dsu.union(u, v);
            }
        }
        let roots: Vec<u32> = (0..vertex_count as u32).map(|v| dsu.find(v)).collect();
        self.components_from_roots(&roots)
    }

    /// Compute strongly connected components.
    ///
    /// Iterative Kosaraju: a forward depth-first pass records finish
    /// order, then a reverse-graph pass in reverse finish order collects
    /// each component. The partition does not depend on traversal start
    /// order. Time complexity: O(V + E).
    #[must_use]
    #[instrument(skip(self))]
    pub fn strongly_connected_components(&self) -> ComponentsResult {
        let vertex_count = self.vertex_count();

        // Pass 1: forward DFS finish order with an explicit stack.
        let mut visited = vec![false; vertex_count];
        let mut finish: Vec<u32> = Vec::with_capacity(vertex_count);
        let mut stack: Vec<(u32, usize)> = Vec::new();
        for start in 0..vertex_count as u32 {
            if visited[start as usize] {
                continue;
            }
            visited[start as usize] = true;
            stack.push((start, 0));
            while let Some(frame) = stack.last_mut() {
                let (v, next_child) = *frame;
                let neighbors = self.out_neighbors(v);
                if next_child < neighbors.len() {
                    frame.1 += 1;
                    let w = neighbors[next_child];
                    if !visited[w as usize] {
                        visited[w as usize] = true;
                        stack.push((w, 0));
                    }
                } else {
                    finish.push(v);
                    stack.pop();
                }
            }
        }

        // Pass 2: reverse-graph traversal in reverse finish order.
        let mut roots = vec![0u32; vertex_count];
        let mut assigned = vec![false; vertex_count];
        let mut dfs: Vec<u32> = Vec::new();
        let mut member_scratch: Vec<u32> = Vec::new();
        for &v in finish.iter().rev() {
            if assigned[v as usize] {
                continue;
            }
            member_scratch.clear();
            assigned[v as usize] = true;
            dfs.push(v);
            while let Some(x) = dfs.pop() {
                member_scratch.push(x);
                for &w in self.in_neighbors(x) {
                    if !assigned[w as usize] {
                        assigned[w as usize] = true;
                        dfs.push(w);
                    }
                }
            }
            // Canonical label: smallest internal ID in the component.
            let root = member_scratch.iter().copied().min().unwrap_or(v);
            for &m in &member_scratch {
                roots[m as usize] = root;
            }
        }

        self.components_from_roots(&roots)
    }

    fn components_from_roots(&self, roots: &[u32]) -> ComponentsResult {
        let mut grouped: HashMap<u32, Vec<u32>> = HashMap::new();
        for (v, &root) in roots.iter().enumerate() {
            grouped.entry(root).or_default().push(v as u32);
        }

        let mut labels = HashMap::with_capacity(roots.len());
        for (v, &root) in roots.iter().enumerate() {
            labels.insert(self.original_id(v as u32), self.original_id(root));
        }

        let mut ordered: Vec<(u32, Vec<u32>)> = grouped.into_iter().collect();
        ordered.sort_unstable_by_key(|(root, _)| *root);
        let members: Vec<Vec<i64>> = ordered
            .into_iter()
            .map(|(_, internals)| internals.iter().map(|&v| self.original_id(v)).collect())
            .collect();

        ComponentsResult {
            labels,
            component_count: members.len(),
            members,
        }
    }
}
