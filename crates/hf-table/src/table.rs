//! The compartment table: validated tabular input for model construction.

use hf_core::normalized_cumsum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{TableError, TableResult};

/// Per-compartment blood volume fractions and inter-compartment flow
/// percentages, as measured.
///
/// Row/column order of `flow_percent` follows `names`. `volume_fraction[i]`
/// is the percentage of total blood volume resident in compartment i;
/// `flow_percent[i][j]` is the percentage of compartment i's outflow going
/// to j (the diagonal is ignored by the model). `flow_sum[i]` is the
/// independently recorded total outflow percentage for row i; it may differ
/// from the row sum of `flow_percent` due to upstream rounding and is kept
/// as supplied.
///
/// All fields are immutable after construction; validation happens once in
/// `new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentTable {
    names: Vec<String>,
    volume_fraction: Vec<f64>,
    flow_percent: Vec<Vec<f64>>,
    flow_sum: Vec<f64>,
}

impl CompartmentTable {
    /// Validate and freeze a table.
    ///
    /// Checks that all dimensions agree with `names.len()`, that names are
    /// unique, and that every numeric entry is finite and non-negative.
    pub fn new(
        names: Vec<String>,
        volume_fraction: Vec<f64>,
        flow_percent: Vec<Vec<f64>>,
        flow_sum: Vec<f64>,
    ) -> TableResult<Self> {
        let size = names.len();
        if size == 0 {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, name) in names.iter().enumerate() {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateName {
                    name: name.clone(),
                    index,
                });
            }
        }

        if volume_fraction.len() != size {
            return Err(TableError::ShapeMismatch {
                what: "volume_fraction",
                actual: volume_fraction.len(),
                expected: size,
            });
        }
        if flow_sum.len() != size {
            return Err(TableError::ShapeMismatch {
                what: "flow_sum",
                actual: flow_sum.len(),
                expected: size,
            });
        }
        if flow_percent.len() != size {
            return Err(TableError::ShapeMismatch {
                what: "flow_percent rows",
                actual: flow_percent.len(),
                expected: size,
            });
        }
        for row in &flow_percent {
            if row.len() != size {
                return Err(TableError::ShapeMismatch {
                    what: "flow_percent columns",
                    actual: row.len(),
                    expected: size,
                });
            }
        }

        for (index, name) in names.iter().enumerate() {
            Self::check_entry("volume_fraction", name, index, volume_fraction[index])?;
            Self::check_entry("flow_sum", name, index, flow_sum[index])?;
            for &v in &flow_percent[index] {
                Self::check_entry("flow_percent", name, index, v)?;
            }
        }

        Ok(Self {
            names,
            volume_fraction,
            flow_percent,
            flow_sum,
        })
    }

    fn check_entry(what: &'static str, name: &str, index: usize, value: f64) -> TableResult<()> {
        if !value.is_finite() {
            return Err(TableError::NonFiniteValue {
                what,
                name: name.to_owned(),
                index,
            });
        }
        if value < 0.0 {
            return Err(TableError::NegativeValue {
                what,
                name: name.to_owned(),
                index,
                value,
            });
        }
        Ok(())
    }

    /// Number of compartments.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Compartment names in row/column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Volume fraction column (percent of total blood volume per row).
    pub fn volume_fraction(&self) -> &[f64] {
        &self.volume_fraction
    }

    /// One row of the flow-percentage matrix.
    pub fn flow_row(&self, i: usize) -> &[f64] {
        &self.flow_percent[i]
    }

    /// The measured total-outflow column.
    pub fn flow_sum(&self) -> &[f64] {
        &self.flow_sum
    }

    /// Off-diagonal row sum of `flow_percent` for row i.
    ///
    /// This is the derived alternative to the measured `flow_sum` column.
    pub fn derived_flow_sum(&self, i: usize) -> f64 {
        self.flow_percent[i]
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, v)| v)
            .sum()
    }

    /// Running normalized cumulative sum of `volume_fraction`.
    ///
    /// Ordering/visual aid for downstream consumers; not used in the
    /// transition math.
    pub fn cumulative_volume(&self) -> TableResult<Vec<f64>> {
        normalized_cumsum(&self.volume_fraction).map_err(|_| TableError::ZeroTotalVolume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_compartments() -> CompartmentTable {
        CompartmentTable::new(
            vec!["heart".into(), "lung".into()],
            vec![50.0, 50.0],
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
            vec![10.0, 10.0],
        )
        .unwrap()
    }

    #[test]
    fn accessors() {
        let t = two_compartments();
        assert_eq!(t.size(), 2);
        assert_eq!(t.names()[1], "lung");
        assert_eq!(t.flow_row(0), &[0.0, 10.0]);
        assert_eq!(t.flow_sum(), &[10.0, 10.0]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = CompartmentTable::new(
            vec!["heart".into(), "heart".into()],
            vec![50.0, 50.0],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            vec![0.0, 0.0],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateName { index: 1, .. }));
    }

    #[test]
    fn ragged_flow_matrix_rejected() {
        let err = CompartmentTable::new(
            vec!["a".into(), "b".into()],
            vec![50.0, 50.0],
            vec![vec![0.0, 1.0], vec![0.0]],
            vec![1.0, 0.0],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TableError::ShapeMismatch {
                what: "flow_percent columns",
                ..
            }
        ));
    }

    #[test]
    fn negative_entry_rejected() {
        let err = CompartmentTable::new(
            vec!["a".into()],
            vec![-1.0],
            vec![vec![0.0]],
            vec![0.0],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::NegativeValue { .. }));
    }

    #[test]
    fn derived_flow_sum_skips_diagonal() {
        let t = CompartmentTable::new(
            vec!["a".into(), "b".into()],
            vec![50.0, 50.0],
            // diagonal entries present in the raw data but not counted
            vec![vec![5.0, 10.0], vec![10.0, 5.0]],
            vec![10.0, 10.0],
        )
        .unwrap();
        assert_eq!(t.derived_flow_sum(0), 10.0);
        assert_eq!(t.derived_flow_sum(1), 10.0);
    }

    #[test]
    fn cumulative_volume_normalized() {
        let t = two_compartments();
        let cum = t.cumulative_volume().unwrap();
        assert!((cum[0] - 0.5).abs() < 1e-12);
        assert!((cum[1] - 1.0).abs() < 1e-12);
    }
}
