//! Configuration for graph store construction.

/// Configuration for [`GraphStore::build`](crate::GraphStore::build).
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    /// Whether edges are directed. When false the edge set is symmetrized
    /// (both directions inserted, duplicates removed) before adjacency
    /// construction.
    pub directed: bool,
    /// Whether to renumber vertices into a dense internal ID range.
    /// When false, original IDs are used directly as internal IDs and
    /// every ID in `[0, max_id]` becomes a vertex (gaps are isolated
    /// vertices).
    pub renumber: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            directed: true,
            renumber: true,
        }
    }
}

impl BuildConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    #[must_use]
    pub const fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    #[must_use]
    pub const fn renumber(mut self, renumber: bool) -> Self {
        self.renumber = renumber;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let config = BuildConfig::new().undirected().renumber(false);
        assert!(!config.directed);
        assert!(!config.renumber);
    }

    #[test]
    fn defaults_are_directed_and_renumbered() {
        let config = BuildConfig::default();
        assert!(config.directed);
        assert!(config.renumber);
    }
}
