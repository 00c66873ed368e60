//! Integration tests for CSV table loading.

use hf_table::{CompartmentTable, TableError, read_table};

const TWO_COMPARTMENT_CSV: &str = "\
compartment,heart,lung,volume,flow_sum
heart,0,10,50,10
lung,10,0,50,10
";

#[test]
fn load_two_compartment_table() {
    let table = read_table(TWO_COMPARTMENT_CSV.as_bytes()).unwrap();

    assert_eq!(table.size(), 2);
    assert_eq!(table.names(), ["heart", "lung"]);
    assert_eq!(table.volume_fraction(), &[50.0, 50.0]);
    assert_eq!(table.flow_row(0), &[0.0, 10.0]);
    assert_eq!(table.flow_row(1), &[10.0, 0.0]);
    assert_eq!(table.flow_sum(), &[10.0, 10.0]);
}

#[test]
fn loaded_table_matches_direct_construction() {
    let loaded = read_table(TWO_COMPARTMENT_CSV.as_bytes()).unwrap();
    let direct = CompartmentTable::new(
        vec!["heart".into(), "lung".into()],
        vec![50.0, 50.0],
        vec![vec![0.0, 10.0], vec![10.0, 0.0]],
        vec![10.0, 10.0],
    )
    .unwrap();
    assert_eq!(loaded, direct);
}

#[test]
fn extra_row_is_a_shape_error() {
    let csv = "compartment,a,b,volume,flow_sum\n\
               a,0,1,50,1\n\
               b,1,0,50,1\n\
               c,0,0,0,0\n";
    let err = read_table(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, TableError::ShapeMismatch { what: "rows", .. }));
}

#[test]
fn missing_row_is_a_shape_error() {
    let csv = "compartment,a,b,volume,flow_sum\na,0,1,50,1\n";
    let err = read_table(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, TableError::ShapeMismatch { what: "rows", .. }));
}

#[test]
fn garbage_cell_is_a_parse_error() {
    let csv = "compartment,a,b,volume,flow_sum\na,0,x,50,1\nb,1,0,50,1\n";
    let err = read_table(csv.as_bytes()).unwrap_err();
    match err {
        TableError::Parse { raw, row, column } => {
            assert_eq!(raw, "x");
            assert_eq!(row, 0);
            assert_eq!(column, "b");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn single_compartment_table_loads() {
    let csv = "compartment,whole_body,volume,flow_sum\nwhole_body,0,100,0\n";
    let table = read_table(csv.as_bytes()).unwrap();
    assert_eq!(table.size(), 1);
    assert_eq!(table.flow_sum(), &[0.0]);
}
