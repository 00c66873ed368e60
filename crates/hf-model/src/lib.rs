//! hf-model: transition-probability derivation for hemoflow.
//!
//! The core of the system: turns a `CompartmentTable` plus total blood
//! volume, cardiac output and time-step resolution into a validated
//! row-stochastic transition matrix and the coupled per-compartment Weibull
//! sojourn scales, and materializes the nonzero transitions into a graph
//! sink.
//!
//! # Example
//!
//! ```
//! use hf_model::{ModelConfig, TransitionModelBuilder};
//! use hf_table::CompartmentTable;
//!
//! let table = CompartmentTable::new(
//!     vec!["heart".into(), "lung".into()],
//!     vec![50.0, 50.0],
//!     vec![vec![0.0, 10.0], vec![10.0, 0.0]],
//!     vec![10.0, 10.0],
//! ).unwrap();
//!
//! let config = ModelConfig {
//!     total_volume_l: 5.0,
//!     cardiac_output_lpm: 6.0,
//!     resolution: 60,
//!     ..ModelConfig::default()
//! };
//! let model = TransitionModelBuilder::new(config).build(&table).unwrap();
//!
//! assert!((model.probability(0, 1) - 0.004).abs() < 1e-12);
//! assert!((model.probability(0, 0) - 0.996).abs() < 1e-12);
//! ```

pub mod builder;
pub mod error;
pub mod model;
pub mod sink;

// Re-exports for ergonomics
pub use builder::{FlowSumPolicy, ModelConfig, TransitionModelBuilder};
pub use error::{ModelError, ModelResult};
pub use model::TransitionModel;
pub use sink::{CompartmentGraphSink, GraphSink};
