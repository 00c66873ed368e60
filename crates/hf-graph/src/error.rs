//! Graph-specific error types.

use hf_core::{EdgeId, NodeId};
use thiserror::Error;

/// Graph construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An edge refers to a node that doesn't exist.
    #[error("Edge {edge} refers to non-existent node {node}")]
    InvalidNodeRef { edge: EdgeId, node: NodeId },

    /// An edge weight is not a finite positive probability.
    #[error("Edge {edge} has invalid weight {weight} (expected finite, in (0, 1])")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    /// Two edges share the same (source, target) pair.
    ///
    /// The endpoint field is `source_node` rather than `source` so thiserror
    /// does not treat it as an error source.
    #[error("Duplicate edge {edge} between node {source_node} and node {target}")]
    DuplicateEdge {
        edge: EdgeId,
        source_node: NodeId,
        target: NodeId,
    },

    /// Two nodes share the same name.
    #[error("Duplicate node name '{name}' at node {node}")]
    DuplicateNodeName { node: NodeId, name: String },

    /// An edge endpoint was given by a name no node carries.
    #[error("No node named '{name}'")]
    UnknownNodeName { name: String },

    /// Adjacency list is inconsistent (edge in node's out list but edge
    /// doesn't leave that node).
    #[error("Edge {edge} in node {node}'s out list but doesn't leave that node")]
    InconsistentAdjacency { edge: EdgeId, node: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
