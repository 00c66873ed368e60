//! hf-core: stable foundation for hemoflow.
//!
//! Contains:
//! - units (uom SI types + constructors for volumes, flow rates, percentages)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for graph objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HemoError, HemoResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
