//! Discrete-time Markov chain queries over a transition matrix.

use hf_core::{Tolerances, nearly_equal};
use hf_model::TransitionModel;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::{ChainError, ChainResult};

/// Power-iteration configuration for the stationary distribution.
pub struct StationaryOptions {
    /// Maximum iterations
    pub max_iterations: usize,
    /// L1 tolerance between successive distributions
    pub tol: f64,
}

impl Default for StationaryOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            tol: 1e-12,
        }
    }
}

/// A discrete-time Markov chain over named compartments.
///
/// Wraps a row-stochastic matrix validated on entry; all queries are pure.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteChain {
    names: Vec<String>,
    p: DMatrix<f64>,
}

impl DiscreteChain {
    /// Validate a transition matrix and its name labels.
    ///
    /// The matrix must be square with one row per name, each entry in
    /// [0, 1] and each row summing to 1 within 1e-9.
    pub fn new(p: DMatrix<f64>, names: Vec<String>) -> ChainResult<Self> {
        if p.nrows() != p.ncols() {
            return Err(ChainError::DimensionMismatch {
                what: "matrix columns",
                actual: p.ncols(),
                expected: p.nrows(),
            });
        }
        if names.len() != p.nrows() {
            return Err(ChainError::DimensionMismatch {
                what: "names",
                actual: names.len(),
                expected: p.nrows(),
            });
        }

        let tol = Tolerances::default();
        for row in 0..p.nrows() {
            let mut sum = 0.0;
            for col in 0..p.ncols() {
                let value = p[(row, col)];
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(ChainError::EntryOutOfRange { row, col, value });
                }
                sum += value;
            }
            if !nearly_equal(sum, 1.0, tol) {
                return Err(ChainError::NotRowStochastic { row, sum });
            }
        }

        Ok(Self { names, p })
    }

    /// Wrap a built transition model (already validated).
    pub fn from_model(model: &TransitionModel) -> ChainResult<Self> {
        Self::new(model.matrix().clone(), model.names().to_vec())
    }

    /// Number of compartments.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Compartment names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The one-step transition matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.p
    }

    /// Index of a compartment by name.
    pub fn index_of(&self, name: &str) -> ChainResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ChainError::UnknownCompartment {
                name: name.to_owned(),
            })
    }

    /// The n-step transition matrix `P^n`.
    pub fn n_step(&self, n: u32) -> DMatrix<f64> {
        let size = self.size();
        let mut result = DMatrix::identity(size, size);
        for _ in 0..n {
            result = result * &self.p;
        }
        result
    }

    /// Push a distribution over compartments forward by `steps` steps.
    ///
    /// `dist` is a probability row vector (stored as a column); it must be
    /// non-negative and sum to 1 within tolerance.
    pub fn propagate(&self, dist: &DVector<f64>, steps: u32) -> ChainResult<DVector<f64>> {
        self.check_distribution(dist)?;
        let mut current = dist.clone();
        for _ in 0..steps {
            current = self.p.transpose() * current;
        }
        Ok(current)
    }

    /// Stationary distribution by left power iteration.
    ///
    /// Starts from the uniform distribution and iterates `x <- P^T x`,
    /// renormalizing each round, until the L1 change drops below tolerance.
    pub fn stationary(&self, opts: &StationaryOptions) -> ChainResult<DVector<f64>> {
        let size = self.size();
        let mut x = DVector::from_element(size, 1.0 / size as f64);
        let pt = self.p.transpose();

        for iter in 0..opts.max_iterations {
            let mut next = &pt * &x;
            let norm: f64 = next.iter().map(|v| v.abs()).sum();
            next /= norm;

            let delta: f64 = next
                .iter()
                .zip(x.iter())
                .map(|(a, b)| (a - b).abs())
                .sum();
            x = next;
            if delta < opts.tol {
                debug!(iterations = iter + 1, "stationary distribution converged");
                return Ok(x);
            }
        }

        Err(ChainError::NoConvergence {
            iterations: opts.max_iterations,
        })
    }

    /// Indices of absorbing compartments (stay probability 1).
    pub fn absorbing(&self) -> Vec<usize> {
        (0..self.size())
            .filter(|&i| self.p[(i, i)] >= 1.0)
            .collect()
    }

    fn check_distribution(&self, dist: &DVector<f64>) -> ChainResult<()> {
        if dist.len() != self.size() {
            return Err(ChainError::DimensionMismatch {
                what: "distribution",
                actual: dist.len(),
                expected: self.size(),
            });
        }
        if dist.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return Err(ChainError::InvalidDistribution {
                what: "entries must be finite and non-negative",
            });
        }
        let sum: f64 = dist.iter().sum();
        if !nearly_equal(sum, 1.0, Tolerances::default()) {
            return Err(ChainError::InvalidDistribution {
                what: "entries must sum to 1",
            });
        }
        Ok(())
    }
}
