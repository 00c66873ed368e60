//! Graph validation logic.

use std::collections::HashSet;

use hf_core::{EdgeId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Node};

/// Validate the graph structure: all references exist, weights are valid
/// probabilities, no duplicate names or parallel edges.
pub(crate) fn validate_structure(nodes: &[Node], edges: &[Edge]) -> GraphResult<()> {
    let mut names = HashSet::new();
    for node in nodes {
        if !names.insert(node.name.as_str()) {
            return Err(GraphError::DuplicateNodeName {
                node: node.id,
                name: node.name.clone(),
            });
        }
    }

    let mut pairs = HashSet::new();
    for edge in edges {
        if edge.source.index() as usize >= nodes.len() {
            return Err(GraphError::InvalidNodeRef {
                edge: edge.id,
                node: edge.source,
            });
        }
        if edge.target.index() as usize >= nodes.len() {
            return Err(GraphError::InvalidNodeRef {
                edge: edge.id,
                node: edge.target,
            });
        }
        if !edge.weight.is_finite() || edge.weight <= 0.0 || edge.weight > 1.0 {
            return Err(GraphError::InvalidWeight {
                edge: edge.id,
                weight: edge.weight,
            });
        }
        if !pairs.insert((edge.source, edge.target)) {
            return Err(GraphError::DuplicateEdge {
                edge: edge.id,
                source_node: edge.source,
                target: edge.target,
            });
        }
    }

    Ok(())
}

/// Validate adjacency lists for consistency with the edge set.
pub(crate) fn validate_adjacency(
    nodes: &[Node],
    edges: &[Edge],
    out_edge_offsets: &[usize],
    out_edges: &[EdgeId],
) -> GraphResult<()> {
    if out_edge_offsets.len() != nodes.len() + 1 {
        return Err(GraphError::InconsistentAdjacency {
            edge: EdgeId::from_index(0),
            node: nodes.first().map_or(NodeId::from_index(0), |n| n.id),
        });
    }

    // Each listed edge must exist and leave the node it is listed under
    for node in nodes {
        let idx = node.id.index() as usize;
        let start = out_edge_offsets[idx];
        let end = out_edge_offsets[idx + 1];

        for &edge_id in &out_edges[start..end] {
            if edge_id.index() as usize >= edges.len() {
                return Err(GraphError::InconsistentAdjacency {
                    edge: edge_id,
                    node: node.id,
                });
            }
            let edge = &edges[edge_id.index() as usize];
            if edge.source != node.id {
                return Err(GraphError::InconsistentAdjacency {
                    edge: edge_id,
                    node: node.id,
                });
            }
        }
    }

    // Every edge appears in exactly one out list
    let mut seen: HashSet<EdgeId> = HashSet::new();
    for &edge_id in out_edges {
        if !seen.insert(edge_id) {
            return Err(GraphError::InconsistentAdjacency {
                edge: edge_id,
                node: edges[edge_id.index() as usize].source,
            });
        }
    }
    for edge in edges {
        if !seen.contains(&edge.id) {
            return Err(GraphError::InconsistentAdjacency {
                edge: edge.id,
                node: edge.source,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_core::Id;

    fn node(i: u32, name: &str) -> Node {
        Node {
            id: Id::from_index(i),
            name: name.into(),
        }
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_structure(&[], &[]).is_ok());
    }

    #[test]
    fn validate_invalid_node_ref() {
        let nodes = vec![node(0, "N1")];
        let edges = vec![Edge {
            id: Id::from_index(0),
            source: Id::from_index(0),
            target: Id::from_index(99), // Invalid!
            weight: 0.5,
        }];

        let result = validate_structure(&nodes, &edges);
        assert!(matches!(
            result.unwrap_err(),
            GraphError::InvalidNodeRef { .. }
        ));
    }

    #[test]
    fn validate_rejects_zero_weight() {
        let nodes = vec![node(0, "N1"), node(1, "N2")];
        let edges = vec![Edge {
            id: Id::from_index(0),
            source: Id::from_index(0),
            target: Id::from_index(1),
            weight: 0.0,
        }];

        let result = validate_structure(&nodes, &edges);
        assert!(matches!(
            result.unwrap_err(),
            GraphError::InvalidWeight { .. }
        ));
    }

    #[test]
    fn validate_rejects_parallel_edges() {
        let nodes = vec![node(0, "N1"), node(1, "N2")];
        let mk = |i: u32| Edge {
            id: Id::from_index(i),
            source: Id::from_index(0),
            target: Id::from_index(1),
            weight: 0.1,
        };
        let edges = vec![mk(0), mk(1)];

        let result = validate_structure(&nodes, &edges);
        assert!(matches!(
            result.unwrap_err(),
            GraphError::DuplicateEdge { .. }
        ));
    }

    #[test]
    fn duplicate_edge_reports_both_endpoints() {
        let err = GraphError::DuplicateEdge {
            edge: Id::from_index(1),
            source_node: Id::from_index(0),
            target: Id::from_index(1),
        };
        // no chained cause: the endpoint is data, not an error source
        assert!(std::error::Error::source(&err).is_none());
        assert_eq!(
            format!("{err}"),
            "Duplicate edge 1 between node 0 and node 1"
        );
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let nodes = vec![node(0, "same"), node(1, "same")];
        let result = validate_structure(&nodes, &[]);
        assert!(matches!(
            result.unwrap_err(),
            GraphError::DuplicateNodeName { .. }
        ));
    }
}
