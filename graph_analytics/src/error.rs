//! Error types for the graph analytics engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type for graph store construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphError {
    /// Edge list is malformed: empty input, negative vertex IDs, or the
    /// vertex set would not fit the 32-bit internal ID space.
    InvalidInput(String),
    /// Query or walk seed references a vertex absent from the store.
    UnknownVertex(i64),
    /// Operation requires a non-empty graph.
    EmptyGraph,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::UnknownVertex(id) => write!(f, "Unknown vertex: {id}"),
            Self::EmptyGraph => write!(f, "Graph has no vertices"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
