//! Integration tests for transition model derivation.

use hf_model::{FlowSumPolicy, GraphSink, ModelConfig, ModelError, TransitionModelBuilder};
use hf_table::CompartmentTable;

fn reference_table() -> CompartmentTable {
    CompartmentTable::new(
        vec!["heart".into(), "lung".into()],
        vec![50.0, 50.0],
        vec![vec![0.0, 10.0], vec![10.0, 0.0]],
        vec![10.0, 10.0],
    )
    .unwrap()
}

fn reference_config() -> ModelConfig {
    ModelConfig {
        total_volume_l: 5.0,
        cardiac_output_lpm: 6.0,
        resolution: 60,
        flow_sum_policy: FlowSumPolicy::Measured,
    }
}

#[test]
fn two_compartment_reference_values() {
    let model = TransitionModelBuilder::new(reference_config())
        .build(&reference_table())
        .unwrap();

    // p[0][1] = (10/100 * 6.0/60) / (5.0 * 50/100) = 0.004
    assert!((model.probability(0, 1) - 0.004).abs() < 1e-12);
    assert!((model.probability(1, 0) - 0.004).abs() < 1e-12);
    // stay probability is the remainder, exactly
    assert_eq!(model.probability(0, 0), 1.0 - model.probability(0, 1));
    assert_eq!(model.probability(1, 1), 1.0 - model.probability(1, 0));

    // scale = (0.01 * 5.0 * 50) / (0.1 * 0.01 * 10) = 250 steps
    assert!((model.scale(0) - 250.0).abs() < 1e-9);
    assert!((model.scale(1) - 250.0).abs() < 1e-9);
}

#[test]
fn rows_sum_to_one() {
    let model = TransitionModelBuilder::new(reference_config())
        .build(&reference_table())
        .unwrap();
    for i in 0..model.size() {
        let sum: f64 = model.matrix().row(i).iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "row {i} sums to {sum}");
        for &p in model.matrix().row(i).iter() {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn zero_volume_with_outflow_is_rejected() {
    let table = CompartmentTable::new(
        vec!["heart".into(), "lung".into()],
        vec![0.0, 100.0],
        vec![vec![0.0, 10.0], vec![10.0, 0.0]],
        vec![10.0, 10.0],
    )
    .unwrap();

    let err = TransitionModelBuilder::new(reference_config())
        .build(&table)
        .unwrap_err();
    match err {
        ModelError::ZeroVolumeWithOutflow { compartment, index } => {
            assert_eq!(compartment, "heart");
            assert_eq!(index, 0);
        }
        other => panic!("expected ZeroVolumeWithOutflow, got {other:?}"),
    }
}

#[test]
fn coarse_resolution_overflows() {
    // resolution 1: the whole per-minute output moves in a single step,
    // far more than the small compartment holds
    let table = CompartmentTable::new(
        vec!["small".into(), "rest".into()],
        vec![10.0, 90.0],
        vec![vec![0.0, 100.0], vec![10.0, 0.0]],
        vec![100.0, 10.0],
    )
    .unwrap();

    let config = ModelConfig {
        resolution: 1,
        ..reference_config()
    };
    let err = TransitionModelBuilder::new(config).build(&table).unwrap_err();
    match err {
        ModelError::OverflowingOutflow {
            compartment,
            index,
            exit_probability,
        } => {
            assert_eq!(compartment, "small");
            assert_eq!(index, 0);
            assert!(exit_probability > 1.0);
        }
        other => panic!("expected OverflowingOutflow, got {other:?}"),
    }
}

#[test]
fn single_compartment_without_outflow_has_no_sojourn_scale() {
    let table = CompartmentTable::new(
        vec!["whole_body".into()],
        vec![100.0],
        vec![vec![0.0]],
        vec![0.0],
    )
    .unwrap();

    let err = TransitionModelBuilder::new(reference_config())
        .build(&table)
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::ZeroOutflowSum { index: 0, .. }
    ));
}

#[test]
fn finer_resolution_shrinks_off_diagonals() {
    let coarse = TransitionModelBuilder::new(reference_config())
        .build(&reference_table())
        .unwrap();
    let fine = TransitionModelBuilder::new(ModelConfig {
        resolution: 120,
        ..reference_config()
    })
    .build(&reference_table())
    .unwrap();

    for i in 0..2 {
        for j in 0..2 {
            if i == j {
                continue;
            }
            assert!(
                fine.probability(i, j) < coarse.probability(i, j),
                "off-diagonal ({i},{j}) did not shrink"
            );
        }
    }
}

#[test]
fn building_twice_is_bit_identical() {
    let builder = TransitionModelBuilder::new(reference_config());
    let a = builder.build(&reference_table()).unwrap();
    let b = builder.build(&reference_table()).unwrap();
    assert_eq!(a.matrix(), b.matrix());
    assert_eq!(a.scales(), b.scales());
}

/// Sink that records calls verbatim, for asserting what the model emits.
#[derive(Default)]
struct RecordingSink {
    nodes: Vec<String>,
    edges: Vec<(String, String, f64)>,
}

impl GraphSink for RecordingSink {
    fn add_node(&mut self, name: &str) {
        self.nodes.push(name.to_owned());
    }

    fn add_edge(&mut self, source: &str, target: &str, weight: f64) {
        self.edges
            .push((source.to_owned(), target.to_owned(), weight));
    }
}

#[test]
fn zero_probability_pairs_emit_no_edges() {
    // Three compartments in a one-way ring: a->b->c->a. Six of the nine
    // ordered pairs have zero probability and must not appear.
    let table = CompartmentTable::new(
        vec!["a".into(), "b".into(), "c".into()],
        vec![30.0, 30.0, 40.0],
        vec![
            vec![0.0, 10.0, 0.0],
            vec![0.0, 0.0, 10.0],
            vec![10.0, 0.0, 0.0],
        ],
        vec![10.0, 10.0, 10.0],
    )
    .unwrap();

    let model = TransitionModelBuilder::new(reference_config())
        .build(&table)
        .unwrap();

    let mut sink = RecordingSink::default();
    model.emit_edges(&mut sink);

    assert_eq!(sink.nodes, ["a", "b", "c"]);
    // one outgoing transition plus one self-loop per compartment
    assert_eq!(sink.edges.len(), 6);
    for (source, target, weight) in &sink.edges {
        let i = model.index_of(source).unwrap();
        let j = model.index_of(target).unwrap();
        assert!(*weight > 0.0);
        assert_eq!(*weight, model.probability(i, j));
    }
    assert!(
        !sink
            .edges
            .iter()
            .any(|(s, t, _)| s == "a" && t == "c")
    );
}

#[test]
fn graph_view_matches_emitted_edges() {
    let model = TransitionModelBuilder::new(reference_config())
        .build(&reference_table())
        .unwrap();
    let graph = model.to_graph().unwrap();
    let summary = graph.summary();

    assert_eq!(summary.node_count, 2);
    assert_eq!(summary.edge_count, 4);
    assert_eq!(summary.names, ["heart", "lung"]);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn random_valid_tables_build_row_stochastic(
            n in 2_usize..6,
            seed_flows in prop::collection::vec(0.1_f64..5.0, 25),
            volumes in prop::collection::vec(1.0_f64..100.0, 5),
        ) {
            let names: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
            let volume_fraction: Vec<f64> = volumes.iter().take(n).copied().collect();
            let flow_percent: Vec<Vec<f64>> = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| if i == j { 0.0 } else { seed_flows[i * 5 + j] })
                        .collect()
                })
                .collect();
            let table = CompartmentTable::new(
                names,
                volume_fraction,
                flow_percent,
                vec![1.0; n],
            ).unwrap();

            // fine resolution keeps every per-step exit fraction small
            let config = ModelConfig {
                total_volume_l: 5.0,
                cardiac_output_lpm: 6.0,
                resolution: 600,
                flow_sum_policy: FlowSumPolicy::Derived,
            };
            let model = TransitionModelBuilder::new(config).build(&table).unwrap();

            for i in 0..n {
                let sum: f64 = model.matrix().row(i).iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
                for &p in model.matrix().row(i).iter() {
                    prop_assert!((0.0..=1.0).contains(&p));
                }
                prop_assert!(model.scale(i) > 0.0);
            }
        }
    }
}
