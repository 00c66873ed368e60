//! hf-chain: chain engines over a built transition model.
//!
//! Provides:
//! - `DiscreteChain`: discrete-time Markov chain queries (n-step
//!   transition, distribution propagation, stationary distribution,
//!   absorbing states)
//! - `SemiMarkovChain`: time-dependent variant with per-compartment
//!   Weibull sojourn times (hazard evaluation, sojourn sampling, path
//!   simulation)

pub mod discrete;
pub mod error;
pub mod sojourn;

// Re-exports for ergonomics
pub use discrete::{DiscreteChain, StationaryOptions};
pub use error::{ChainError, ChainResult};
pub use sojourn::{SemiMarkovChain, Visit};
