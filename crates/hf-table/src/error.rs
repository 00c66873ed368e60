//! Table loading and validation errors.

use thiserror::Error;

/// Errors raised while loading or validating a compartment table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error reading table: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Missing column '{name}' in table header")]
    MissingColumn { name: &'static str },

    #[error("Table shape mismatch: {what} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("Duplicate compartment name '{name}' (row {index})")]
    DuplicateName { name: String, index: usize },

    #[error("Negative {what} for compartment '{name}' (row {index}): {value}")]
    NegativeValue {
        what: &'static str,
        name: String,
        index: usize,
        value: f64,
    },

    #[error("Non-finite {what} for compartment '{name}' (row {index})")]
    NonFiniteValue {
        what: &'static str,
        name: String,
        index: usize,
    },

    #[error("Row {index} is labelled '{found}' but header column {index} is '{expected}'")]
    RowOrderMismatch {
        index: usize,
        found: String,
        expected: String,
    },

    #[error("Cannot parse '{raw}' as a number (row {row}, column '{column}')")]
    Parse {
        raw: String,
        row: usize,
        column: String,
    },

    #[error("Table has no compartments")]
    Empty,

    #[error("Total volume fraction is zero; cumulative volume is undefined")]
    ZeroTotalVolume,
}

pub type TableResult<T> = Result<T, TableError>;
