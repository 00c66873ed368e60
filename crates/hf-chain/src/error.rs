//! Error types for chain engines.

use thiserror::Error;

/// Errors raised by the discrete and semi-Markov chain engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("Dimension mismatch: {what} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("Row {row} of the transition matrix sums to {sum}, expected 1")]
    NotRowStochastic { row: usize, sum: f64 },

    #[error("Transition matrix entry ({row},{col}) = {value} is not a probability")]
    EntryOutOfRange { row: usize, col: usize, value: f64 },

    #[error("Non-positive {what} at index {index}: {value}")]
    NonPositiveParameter {
        what: &'static str,
        index: usize,
        value: f64,
    },

    #[error("Initial distribution is invalid: {what}")]
    InvalidDistribution { what: &'static str },

    #[error("Power iteration did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("No compartment named '{name}'")]
    UnknownCompartment { name: String },

    #[error("Compartment {index} out of range (chain has {size} compartments)")]
    IndexOutOfRange { index: usize, size: usize },
}

pub type ChainResult<T> = Result<T, ChainError>;
