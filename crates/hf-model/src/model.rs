//! The built transition model: immutable outputs of the derivation.

use hf_graph::Graph;
use nalgebra::{DMatrix, DVector};

use crate::error::ModelResult;
use crate::sink::{CompartmentGraphSink, GraphSink};

/// A validated one-step transition model over anatomical compartments.
///
/// Holds the row-stochastic transition matrix, the coupled Weibull sojourn
/// scales (in time steps) and the cumulative volume ordering. Computed once
/// at construction; nothing here mutates afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    names: Vec<String>,
    matrix: DMatrix<f64>,
    scales: DVector<f64>,
    cumulative_volume: Vec<f64>,
    resolution: u32,
}

impl TransitionModel {
    pub(crate) fn from_parts(
        names: Vec<String>,
        matrix: DMatrix<f64>,
        scales: DVector<f64>,
        cumulative_volume: Vec<f64>,
        resolution: u32,
    ) -> Self {
        Self {
            names,
            matrix,
            scales,
            cumulative_volume,
            resolution,
        }
    }

    /// Number of compartments.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Compartment names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The row-stochastic one-step transition matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// One-step probability of moving from compartment i to j.
    pub fn probability(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Weibull scale parameters per compartment, in time steps.
    pub fn scales(&self) -> &DVector<f64> {
        &self.scales
    }

    /// Sojourn scale for compartment i.
    pub fn scale(&self, i: usize) -> f64 {
        self.scales[i]
    }

    /// Running normalized cumulative volume fraction (ordering aid).
    pub fn cumulative_volume(&self) -> &[f64] {
        &self.cumulative_volume
    }

    /// Steps per minute of cardiac output used at construction.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Index of a compartment by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Materialize all nonzero transitions into a graph sink.
    ///
    /// Every compartment becomes a node; every `p[i][j] > 0` (self-loops
    /// included) becomes a weighted directed edge. Zero-probability pairs
    /// are skipped so the sink stays sparse.
    pub fn emit_edges(&self, sink: &mut dyn GraphSink) {
        for name in &self.names {
            sink.add_node(name);
        }
        for i in 0..self.size() {
            for j in 0..self.size() {
                let p = self.matrix[(i, j)];
                if p > 0.0 {
                    sink.add_edge(&self.names[i], &self.names[j], p);
                }
            }
        }
    }

    /// Build the compartment graph view of this model.
    pub fn to_graph(&self) -> ModelResult<Graph> {
        let mut sink = CompartmentGraphSink::new();
        self.emit_edges(&mut sink);
        sink.finish()
    }
}
