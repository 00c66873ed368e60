//! Incremental graph builder.

use std::collections::HashMap;

use hf_core::{EdgeId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Graph, Node};
use crate::validate;

/// Builder for constructing a compartment graph incrementally.
///
/// Use `add_node` and `add_edge` to build up the graph, then call `build()`
/// to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_id: u32,
    next_edge_id: u32,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a directed edge with a transition-probability weight.
    ///
    /// The weight must be a finite probability in (0, 1]; zero-probability
    /// transitions are never materialized as edges.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> GraphResult<EdgeId> {
        let id = EdgeId::from_index(self.next_edge_id);
        if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
            return Err(GraphError::InvalidWeight { edge: id, weight });
        }
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            source,
            target,
            weight,
        });
        Ok(id)
    }

    /// Look up a previously added node by name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Build and validate the graph, returning an immutable `Graph`.
    ///
    /// This performs validation and constructs compact adjacency lists.
    pub fn build(self) -> GraphResult<Graph> {
        // First validate the structure
        validate::validate_structure(&self.nodes, &self.edges)?;

        // Build adjacency lists: node -> [outgoing edges]
        let (out_edge_offsets, out_edges) = Self::build_adjacency(&self.nodes, &self.edges);

        // Validate adjacency consistency
        validate::validate_adjacency(&self.nodes, &self.edges, &out_edge_offsets, &out_edges)?;

        Ok(Graph {
            nodes: self.nodes,
            edges: self.edges,
            out_edge_offsets,
            out_edges,
        })
    }

    /// Build compact adjacency lists: for each node, collect its outgoing edges.
    fn build_adjacency(nodes: &[Node], edges: &[Edge]) -> (Vec<usize>, Vec<EdgeId>) {
        // Group edges by source node
        let mut node_to_edges: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        for edge in edges {
            node_to_edges.entry(edge.source).or_default().push(edge.id);
        }

        // Sort each node's edge list for determinism
        for edge_list in node_to_edges.values_mut() {
            edge_list.sort_by_key(|e| e.index());
        }

        // Build offsets and flat list
        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat_edges = Vec::new();
        offsets.push(0);

        for node in nodes {
            if let Some(edge_list) = node_to_edges.get(&node.id) {
                flat_edges.extend_from_slice(edge_list);
            }
            offsets.push(flat_edges.len());
        }

        (offsets, flat_edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_basic() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("heart");
        let n2 = builder.add_node("lung");
        let e1 = builder.add_edge(n1, n2, 0.004).unwrap();

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(e1.index(), 0);
        assert_eq!(builder.nodes.len(), 2);
        assert_eq!(builder.edges.len(), 1);
    }

    #[test]
    fn builder_rejects_bad_weight_eagerly() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("a");
        let n2 = builder.add_node("b");
        assert!(builder.add_edge(n1, n2, 0.0).is_err());
        assert!(builder.add_edge(n1, n2, 1.5).is_err());
        assert!(builder.add_edge(n1, n2, f64::NAN).is_err());
    }

    #[test]
    fn builder_node_lookup() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("heart");
        builder.add_node("lung");
        assert_eq!(builder.node_by_name("heart"), Some(n1));
        assert_eq!(builder.node_by_name("liver"), None);
    }

    #[test]
    fn builder_build_simple() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("heart");
        let n2 = builder.add_node("lung");
        builder.add_edge(n1, n2, 0.004).unwrap();
        builder.add_edge(n2, n1, 0.004).unwrap();
        // self-loop: staying put is a legal transition
        builder.add_edge(n1, n1, 0.996).unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 3);

        // Check adjacency
        assert_eq!(graph.out_edges(n1).len(), 2);
        assert_eq!(graph.out_edges(n2).len(), 1);
    }
}
