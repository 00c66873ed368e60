//! Error types for transition model construction.

use hf_core::HemoError;
use hf_graph::GraphError;
use hf_table::TableError;
use thiserror::Error;

/// Errors that can occur while deriving the transition model.
///
/// All of these are fatal at construction time: no partial or degraded
/// model is ever returned, and nothing is clamped or reconciled silently.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Non-positive scalar: {what} = {value}")]
    NonPositiveScalar { what: &'static str, value: f64 },

    #[error(
        "Compartment '{compartment}' (row {index}) has zero volume but nonzero outflow; \
         its exit rate is undefined"
    )]
    ZeroVolumeWithOutflow { compartment: String, index: usize },

    #[error(
        "Compartment '{compartment}' (row {index}) would lose {exit_probability} of its \
         contents in one step; the time-step resolution is too coarse for its flow/volume ratio"
    )]
    OverflowingOutflow {
        compartment: String,
        index: usize,
        exit_probability: f64,
    },

    #[error(
        "Compartment '{compartment}' (row {index}) has zero recorded outflow; \
         its sojourn scale is undefined"
    )]
    ZeroOutflowSum { compartment: String, index: usize },

    #[error("Row {index} of the transition matrix sums to {sum}, expected 1")]
    NonStochasticRow { index: usize, sum: f64 },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] HemoError),
}

pub type ModelResult<T> = Result<T, ModelError>;
