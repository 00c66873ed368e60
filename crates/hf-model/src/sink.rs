//! Graph sink seam between the model and its graph collaborator.

use hf_graph::{Graph, GraphBuilder, GraphError};

use crate::error::ModelResult;

/// Receiver for the nonzero transitions of a built model.
///
/// The model only writes through this interface and never reads back;
/// implementations are interchangeable (graph library, test recorder, ...).
pub trait GraphSink {
    fn add_node(&mut self, name: &str);
    fn add_edge(&mut self, source: &str, target: &str, weight: f64);
}

/// `GraphSink` adapter over the hf-graph builder.
///
/// Errors from the underlying builder are held until `finish`, keeping the
/// sink interface write-only as the model expects.
#[derive(Debug, Default)]
pub struct CompartmentGraphSink {
    builder: GraphBuilder,
    error: Option<GraphError>,
}

impl CompartmentGraphSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and freeze the collected graph.
    pub fn finish(self) -> ModelResult<Graph> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        Ok(self.builder.build()?)
    }
}

impl GraphSink for CompartmentGraphSink {
    fn add_node(&mut self, name: &str) {
        self.builder.add_node(name);
    }

    fn add_edge(&mut self, source: &str, target: &str, weight: f64) {
        if self.error.is_some() {
            return;
        }
        let (s, t) = match (
            self.builder.node_by_name(source),
            self.builder.node_by_name(target),
        ) {
            (Some(s), Some(t)) => (s, t),
            (None, _) => {
                self.error = Some(GraphError::UnknownNodeName {
                    name: source.to_owned(),
                });
                return;
            }
            (_, None) => {
                self.error = Some(GraphError::UnknownNodeName {
                    name: target.to_owned(),
                });
                return;
            }
        };
        if let Err(err) = self.builder.add_edge(s, t, weight) {
            self.error = Some(err);
        }
    }
}
