//! Core graph data structures.

use hf_core::{EdgeId, NodeId};
use serde::Serialize;

/// A node in the compartment graph: one anatomical compartment.
///
/// Nodes are minimal: an ID and a name for human reference. All transition
/// data lives on the edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// A directed edge carrying a one-step transition probability.
///
/// Edges exist only for nonzero transitions; the graph stays sparse.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// The graph: a validated, immutable collection of nodes and weighted edges.
///
/// The graph stores:
/// - All nodes and edges in vectors (indexed by their IDs).
/// - Compact out-adjacency: for each node, which edges leave it.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,

    /// Offsets for node->edge adjacency: node i's outgoing edges are in
    /// out_edges[out_edge_offsets[i]..out_edge_offsets[i+1]].
    pub(crate) out_edge_offsets: Vec<usize>,

    /// Flat list of edge IDs grouped by source node (sorted by node ID then
    /// edge ID for determinism).
    pub(crate) out_edges: Vec<EdgeId>,
}

/// Diagnostic summary of a compartment graph.
///
/// Informational reporting surface only: compartment count, edge count and
/// the name list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub names: Vec<String>,
}

impl Graph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    /// Get an edge by ID (returns None if ID out of bounds).
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index() as usize)
    }

    /// Iterate over the IDs of edges leaving a given node.
    pub fn out_edges(&self, node_id: NodeId) -> &[EdgeId] {
        let idx = node_id.index() as usize;
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.out_edge_offsets[idx];
        let end = self.out_edge_offsets[idx + 1];
        &self.out_edges[start..end]
    }

    /// Number of edges leaving a node.
    pub fn out_degree(&self, node_id: NodeId) -> usize {
        self.out_edges(node_id).len()
    }

    /// Number of edges arriving at a node.
    pub fn in_degree(&self, node_id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.target == node_id).count()
    }

    /// Find a node by name.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Build the diagnostic summary.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            names: self.nodes.iter().map(|n| n.name.clone()).collect(),
        }
    }
}
