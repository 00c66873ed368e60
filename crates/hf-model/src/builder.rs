//! Transition model derivation: the core computation.
//!
//! Turns a validated `CompartmentTable` plus three scalars into a
//! row-stochastic transition matrix and the matching per-compartment
//! sojourn-scale array. Both are derived in one pass from the same
//! normalized cardiac-output and volume terms so they cannot drift apart.

use hf_core::{Tolerances, ensure_finite, l, lpm, nearly_equal, pct, per_step_volume};
use hf_table::CompartmentTable;
use nalgebra::{DMatrix, DVector};
use tracing::debug;
use uom::si::ratio::ratio;
use uom::si::volume::liter;

use crate::error::{ModelError, ModelResult};
use crate::model::TransitionModel;

/// Which outflow total feeds the sojourn-scale denominator.
///
/// The table carries an independently measured `flow_sum` column that may
/// disagree with the row sum of the flow matrix due to upstream rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowSumPolicy {
    /// Trust the table's `flow_sum` column as measured (default).
    #[default]
    Measured,
    /// Recompute the off-diagonal row sum of `flow_percent`.
    Derived,
}

/// Scalar inputs for model construction.
///
/// Defaults are the ICRP adult male reference values: 5.3 L total blood
/// volume, 6.5 L/min cardiac output, resolution 60 (one-second steps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// Total blood volume in liters.
    pub total_volume_l: f64,
    /// Cardiac output in liters per minute.
    pub cardiac_output_lpm: f64,
    /// Number of time steps the per-minute cardiac output is divided into.
    pub resolution: u32,
    pub flow_sum_policy: FlowSumPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            total_volume_l: 5.3,
            cardiac_output_lpm: 6.5,
            resolution: 60,
            flow_sum_policy: FlowSumPolicy::Measured,
        }
    }
}

/// Builder deriving `TransitionModel`s from compartment tables.
#[derive(Debug, Clone, Default)]
pub struct TransitionModelBuilder {
    config: ModelConfig,
}

impl TransitionModelBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Derive the transition matrix and sojourn scales from a table.
    ///
    /// Pure and deterministic; validates eagerly and fails on the first
    /// violated precondition without touching the table.
    pub fn build(&self, table: &CompartmentTable) -> ModelResult<TransitionModel> {
        self.check_scalars()?;

        let n = table.size();
        debug!(compartments = n, resolution = self.config.resolution, "building transition model");

        // Volume of blood moved by the circulation during one time step.
        let step_flow = per_step_volume(lpm(self.config.cardiac_output_lpm), self.config.resolution);
        let total_volume = l(self.config.total_volume_l);

        let mut matrix = DMatrix::<f64>::zeros(n, n);
        let mut scales = DVector::<f64>::zeros(n);

        for i in 0..n {
            let name = &table.names()[i];
            let flow_row = table.flow_row(i);
            let volume_fraction = table.volume_fraction()[i];

            let has_outflow = flow_row
                .iter()
                .enumerate()
                .any(|(j, &f)| j != i && f > 0.0);
            if volume_fraction == 0.0 && has_outflow {
                return Err(ModelError::ZeroVolumeWithOutflow {
                    compartment: name.clone(),
                    index: i,
                });
            }

            // Absolute blood volume resident in compartment i.
            let resident = total_volume * pct(volume_fraction);

            // Off-diagonal exit probabilities: volume leaving i toward j in
            // one step, as a fraction of i's resident volume. The diagonal
            // of the input is ignored.
            let mut exit_probability = 0.0;
            for (j, &flow) in flow_row.iter().enumerate() {
                if j == i || flow == 0.0 {
                    continue;
                }
                let moved = step_flow * pct(flow);
                let p = ensure_finite((moved / resident).get::<ratio>(), "transition probability")?;
                matrix[(i, j)] = p;
                exit_probability += p;
            }

            // Stay probability is always the remainder, never derived
            // independently; a negative remainder means the resolution is
            // too coarse for this row's flow/volume ratio.
            let stay = 1.0 - exit_probability;
            if stay < 0.0 {
                return Err(ModelError::OverflowingOutflow {
                    compartment: name.clone(),
                    index: i,
                    exit_probability,
                });
            }
            matrix[(i, i)] = stay;

            let flow_sum = match self.config.flow_sum_policy {
                FlowSumPolicy::Measured => table.flow_sum()[i],
                FlowSumPolicy::Derived => table.derived_flow_sum(i),
            };
            if flow_sum == 0.0 {
                return Err(ModelError::ZeroOutflowSum {
                    compartment: name.clone(),
                    index: i,
                });
            }

            // Mean residence time in steps: resident volume over absolute
            // egress volume per step. Reused as the Weibull scale so the
            // time-dependent chain's mean sojourn matches the discrete
            // chain's implied mean at the exponential shape.
            let egress = step_flow * pct(flow_sum);
            let scale = ensure_finite((resident / egress).get::<ratio>(), "sojourn scale")?;
            if scale <= 0.0 {
                return Err(ModelError::ZeroVolumeWithOutflow {
                    compartment: name.clone(),
                    index: i,
                });
            }
            scales[i] = scale;
        }

        check_row_stochastic(&matrix)?;

        debug!(
            step_flow_l = step_flow.get::<liter>(),
            "transition model built"
        );

        Ok(TransitionModel::from_parts(
            table.names().to_vec(),
            matrix,
            scales,
            table.cumulative_volume()?,
            self.config.resolution,
        ))
    }

    fn check_scalars(&self) -> ModelResult<()> {
        let cfg = &self.config;
        if !cfg.total_volume_l.is_finite() || cfg.total_volume_l <= 0.0 {
            return Err(ModelError::NonPositiveScalar {
                what: "total_volume_l",
                value: cfg.total_volume_l,
            });
        }
        if !cfg.cardiac_output_lpm.is_finite() || cfg.cardiac_output_lpm <= 0.0 {
            return Err(ModelError::NonPositiveScalar {
                what: "cardiac_output_lpm",
                value: cfg.cardiac_output_lpm,
            });
        }
        if cfg.resolution == 0 {
            return Err(ModelError::NonPositiveScalar {
                what: "resolution",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Postcondition: every row sums to 1 within tolerance and every entry is a
/// probability.
fn check_row_stochastic(matrix: &DMatrix<f64>) -> ModelResult<()> {
    let tol = Tolerances::default();
    for i in 0..matrix.nrows() {
        let sum: f64 = matrix.row(i).iter().sum();
        if !nearly_equal(sum, 1.0, tol) {
            return Err(ModelError::NonStochasticRow { index: i, sum });
        }
        for &p in matrix.row(i).iter() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ModelError::NonStochasticRow { index: i, sum });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_2() -> CompartmentTable {
        CompartmentTable::new(
            vec!["heart".into(), "lung".into()],
            vec![50.0, 50.0],
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
            vec![10.0, 10.0],
        )
        .unwrap()
    }

    fn config_2() -> ModelConfig {
        ModelConfig {
            total_volume_l: 5.0,
            cardiac_output_lpm: 6.0,
            resolution: 60,
            flow_sum_policy: FlowSumPolicy::Measured,
        }
    }

    #[test]
    fn reference_two_compartment_values() {
        let model = TransitionModelBuilder::new(config_2()).build(&table_2()).unwrap();
        // p[0][1] = (10/100 * 0.1) / (5.0 * 0.5) = 0.004
        assert!((model.probability(0, 1) - 0.004).abs() < 1e-12);
        assert!((model.probability(0, 0) - 0.996).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_scalars() {
        let mut cfg = config_2();
        cfg.total_volume_l = 0.0;
        let err = TransitionModelBuilder::new(cfg).build(&table_2()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonPositiveScalar {
                what: "total_volume_l",
                ..
            }
        ));

        let mut cfg = config_2();
        cfg.resolution = 0;
        let err = TransitionModelBuilder::new(cfg).build(&table_2()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonPositiveScalar {
                what: "resolution",
                ..
            }
        ));
    }

    #[test]
    fn derived_policy_uses_row_sum() {
        // flow_sum column deliberately disagrees with the row sum
        let table = CompartmentTable::new(
            vec!["a".into(), "b".into()],
            vec![50.0, 50.0],
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
            vec![20.0, 20.0],
        )
        .unwrap();

        let mut cfg = config_2();
        cfg.flow_sum_policy = FlowSumPolicy::Derived;
        let derived = TransitionModelBuilder::new(cfg).build(&table).unwrap();

        cfg.flow_sum_policy = FlowSumPolicy::Measured;
        let measured = TransitionModelBuilder::new(cfg).build(&table).unwrap();

        // Same matrix either way; scales differ by the flow_sum ratio
        assert_eq!(derived.probability(0, 1), measured.probability(0, 1));
        assert!((derived.scale(0) / measured.scale(0) - 2.0).abs() < 1e-9);
    }
}
