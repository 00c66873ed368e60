//! hf-table: compartment table input for hemoflow.
//!
//! Provides:
//! - `CompartmentTable`: per-compartment volume fractions, inter-compartment
//!   flow percentages and measured outflow sums, validated on construction
//! - A CSV loader for the flattened spreadsheet layout
//!
//! # Example
//!
//! ```
//! use hf_table::CompartmentTable;
//!
//! let table = CompartmentTable::new(
//!     vec!["heart".into(), "lung".into()],
//!     vec![50.0, 50.0],
//!     vec![vec![0.0, 10.0], vec![10.0, 0.0]],
//!     vec![10.0, 10.0],
//! ).unwrap();
//!
//! assert_eq!(table.size(), 2);
//! ```

pub mod error;
pub mod loader;
pub mod table;

// Re-exports for ergonomics
pub use error::{TableError, TableResult};
pub use loader::{read_table, read_table_from_path};
pub use table::CompartmentTable;
