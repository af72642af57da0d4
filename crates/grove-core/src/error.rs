//! Error types for graph queries

use thiserror::Error;

/// The only failure analyzer queries can produce: the caller named a node
/// that is not in the graph. Everything else degrades to a partial or empty
/// result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node not found in graph: {path}")]
    NodeNotFound { path: String },
}
