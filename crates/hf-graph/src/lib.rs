//! hf-graph: directed weighted compartment graph for hemoflow.
//!
//! Provides:
//! - Core graph data structures (Node, Edge, Graph)
//! - Incremental graph builder with validation
//! - A diagnostic summary (node/edge counts, name list) for reporting
//!
//! # Example
//!
//! ```
//! use hf_graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::new();
//! let heart = builder.add_node("heart");
//! let lung = builder.add_node("lung");
//! builder.add_edge(heart, lung, 0.004).unwrap();
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.edges().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::GraphError;
pub use graph::{Edge, Graph, GraphSummary, Node};
