//! CSV loader for the compartment table.
//!
//! Expected layout (the measurement spreadsheet flattened to CSV): a header
//! row `compartment,<name 1>,...,<name N>,volume,flow_sum`, then one row per
//! compartment carrying its name, N flow percentages, its volume fraction
//! and its measured outflow sum. Row order must match header column order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{TableError, TableResult};
use crate::table::CompartmentTable;

const VOLUME_COLUMN: &str = "volume";
const FLOW_SUM_COLUMN: &str = "flow_sum";

/// Read a compartment table from any CSV source.
pub fn read_table<R: Read>(reader: R) -> TableResult<CompartmentTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    if header.len() < 4 {
        return Err(TableError::MissingColumn { name: VOLUME_COLUMN });
    }
    let n_cols = header.len();
    if &header[n_cols - 2] != VOLUME_COLUMN {
        return Err(TableError::MissingColumn { name: VOLUME_COLUMN });
    }
    if &header[n_cols - 1] != FLOW_SUM_COLUMN {
        return Err(TableError::MissingColumn {
            name: FLOW_SUM_COLUMN,
        });
    }

    let names: Vec<String> = header
        .iter()
        .skip(1)
        .take(n_cols - 3)
        .map(str::to_owned)
        .collect();
    let size = names.len();

    let mut volume_fraction = Vec::with_capacity(size);
    let mut flow_percent = Vec::with_capacity(size);
    let mut flow_sum = Vec::with_capacity(size);

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() != n_cols {
            return Err(TableError::ShapeMismatch {
                what: "row fields",
                actual: record.len(),
                expected: n_cols,
            });
        }
        if row >= size {
            return Err(TableError::ShapeMismatch {
                what: "rows",
                actual: row + 1,
                expected: size,
            });
        }
        if &record[0] != names[row].as_str() {
            return Err(TableError::RowOrderMismatch {
                index: row,
                found: record[0].to_owned(),
                expected: names[row].clone(),
            });
        }

        let mut flows = Vec::with_capacity(size);
        for (j, name) in names.iter().enumerate() {
            flows.push(parse_field(&record[1 + j], row, name)?);
        }
        flow_percent.push(flows);
        volume_fraction.push(parse_field(&record[n_cols - 2], row, VOLUME_COLUMN)?);
        flow_sum.push(parse_field(&record[n_cols - 1], row, FLOW_SUM_COLUMN)?);
    }

    if volume_fraction.len() != size {
        return Err(TableError::ShapeMismatch {
            what: "rows",
            actual: volume_fraction.len(),
            expected: size,
        });
    }

    CompartmentTable::new(names, volume_fraction, flow_percent, flow_sum)
}

/// Read a compartment table from a CSV file on disk.
pub fn read_table_from_path(path: &Path) -> TableResult<CompartmentTable> {
    let file = File::open(path)?;
    read_table(file)
}

fn parse_field(raw: &str, row: usize, column: &str) -> TableResult<f64> {
    // Blank cells in the spreadsheet mean "no flow", same as the original's
    // fillna(0).
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| TableError::Parse {
        raw: raw.to_owned(),
        row,
        column: column.to_owned(),
    })
}
