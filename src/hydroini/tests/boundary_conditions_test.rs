// hydroini/tests/boundary_conditions_test.rs

//! Integration tests reading a complete boundary-conditions file with one
//! forcing of every common function.

use hydroini::bc::{
    self, ForcingFunction, ForcingModel, QuantityUnit, TimeInterpolation, VerticalInterpolation,
    VerticalPositionType,
};
use hydroini::{interpret, FieldValue, IniError};
use std::collections::HashSet;
use std::sync::Arc;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/boundaryconditions.bc"
);

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

#[test]
fn test_six_forcings_with_distinct_schemas() {
    init_logger();
    let doc = hydroini::read(FIXTURE).expect("Failed to read fixture");
    let records = interpret(&doc, bc::registry().unwrap()).expect("Failed to interpret fixture");

    assert_eq!(records.len(), 7);
    assert_eq!(records[0].type_name(), "General");

    let forcings = &records[1..];
    let functions: Vec<_> = forcings.iter().filter_map(|r| r.variant()).collect();
    assert_eq!(
        functions,
        vec![
            "timeseries",
            "harmonic",
            "harmoniccorrection",
            "t3d",
            "qhtable",
            "constant"
        ]
    );

    let schemas: HashSet<_> = forcings
        .iter()
        .map(|r| Arc::as_ptr(r.schema()) as usize)
        .collect();
    assert_eq!(schemas.len(), 6);
}

#[test]
fn test_timeseries_table() {
    init_logger();
    let doc = hydroini::read(FIXTURE).unwrap();
    let records = interpret(&doc, bc::registry().unwrap()).unwrap();
    let timeseries = &records[1];

    assert_eq!(timeseries.get_str("timeInterpolation"), Some("linear"));
    assert_eq!(timeseries.get_f64("offset"), Some(0.0));
    assert_eq!(timeseries.get_f64("factor"), Some(1.0));

    let table = timeseries.table().expect("timeseries has a table");
    assert_eq!(
        table.to_numeric().unwrap(),
        vec![vec![0.0, 1.23], vec![60.0, 2.34], vec![120.0, 3.45]]
    );
    // Header entries stay out of the table.
    assert_eq!(doc.blocks()[1].entries().len(), 7);
}

#[test]
fn test_quantity_unit_pairs_are_positional() {
    let doc = hydroini::read(FIXTURE).unwrap();
    let records = interpret(&doc, bc::registry().unwrap()).unwrap();

    let pairs: Vec<_> = records[1]
        .pairs("quantity", "unit")
        .into_iter()
        .map(|(q, u)| (q.to_string(), u.to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (
                "time".to_string(),
                "minutes since 2015-01-01 00:00:00".to_string()
            ),
            ("dischargebnd".to_string(), "m3/s".to_string()),
        ]
    );
}

#[test]
fn test_t3d_extras_and_comments() {
    init_logger();
    let doc = hydroini::read(FIXTURE).unwrap();
    let records = interpret(&doc, bc::registry().unwrap()).unwrap();
    let t3d = &records[4];

    assert_eq!(
        t3d.get("verticalPositions"),
        Some(&FieldValue::FloatList(vec![1.0, 2.0, 3.0]))
    );
    assert_eq!(t3d.extra("verticalPosition"), Some("3"));
    assert_eq!(t3d.extras()[0].comment_text(), Some("legacy key, kept as is"));
    assert_eq!(t3d.comments()[0].body(), "salinity profile at the sea boundary");
    assert_eq!(t3d.get_all("quantity").len(), 4);
}

#[test]
fn test_forcing_model() {
    init_logger();
    let model = ForcingModel::read(FIXTURE).unwrap();
    assert_eq!(model.general.file_version, "1.01");
    assert_eq!(model.forcings.len(), 6);

    assert_eq!(
        model.forcings[0].function,
        ForcingFunction::TimeSeries {
            time_interpolation: TimeInterpolation::Linear,
            offset: 0.0,
            factor: 1.0,
        }
    );
    assert_eq!(
        model.forcings[1].function,
        ForcingFunction::Harmonic { factor: 1.0 }
    );
    assert_eq!(
        model.forcings[2].function,
        ForcingFunction::HarmonicCorrection
    );
    match &model.forcings[3].function {
        ForcingFunction::T3D {
            vertical_interpolation,
            vertical_position_type,
            ..
        } => {
            assert_eq!(*vertical_interpolation, VerticalInterpolation::Linear);
            assert_eq!(*vertical_position_type, VerticalPositionType::PercentageBed);
        }
        other => panic!("expected t3d, got {:?}", other),
    }
    assert_eq!(
        model.forcing("QH_0001").unwrap().quantities,
        vec![
            QuantityUnit::new("qhbnd discharge", "m3/s"),
            QuantityUnit::new("qhbnd waterlevel", "m"),
        ]
    );
    assert_eq!(
        model.forcing("Lateral_0001").unwrap().table.to_numeric().unwrap(),
        vec![vec![2.5]]
    );
}

#[test]
fn test_forcing_model_round_trip() {
    let doc = hydroini::read(FIXTURE).unwrap();
    let model = ForcingModel::from_document(&doc).unwrap();
    assert_eq!(model.to_document().unwrap(), doc);
}

#[test]
fn test_t3d_block_through_qhtable_schema_fails() {
    let doc = hydroini::read(FIXTURE).unwrap();
    let registry = bc::registry().unwrap();
    let qhtable = registry.schema("Forcing", Some("qhtable")).unwrap();

    let err = hydroini::build(&doc.blocks()[4], &qhtable).unwrap_err();
    assert!(
        matches!(
            err,
            IniError::UnknownVariant { .. } | IniError::MissingField { .. }
        ),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_t3d_without_vertical_positions() {
    let text = "\
[Forcing]
name                  = sea
function              = t3d
verticalInterpolation = log
verticalPositionType  = ZBed
quantity              = time
unit                  = minutes
";
    let err = text.parse::<ForcingModel>().unwrap_err();
    match err {
        IniError::MissingField {
            field,
            variant,
            block_index,
            ..
        } => {
            assert_eq!(field, "verticalPositions");
            assert_eq!(variant.as_deref(), Some("t3d"));
            assert_eq!(block_index, Some(0));
        }
        other => panic!("expected missing field, got {:?}", other),
    }
}

#[test]
fn test_case_insensitive_headers_keys_and_functions() {
    let text = "\
[FORCING]
Name              = left
FUNCTION          = TimeSeries
TimeInterpolation = BlockTo
Quantity          = time
Unit              = minutes
0 1
";
    let doc = hydroini::parse(text).unwrap();
    let records = interpret(&doc, bc::registry().unwrap()).unwrap();
    assert_eq!(records[0].variant(), Some("timeseries"));
    assert_eq!(records[0].get_str("timeinterpolation"), Some("blockTo"));

    // Written spelling survives a round trip.
    let projected = hydroini::project(&records, bc::registry().unwrap()).unwrap();
    assert_eq!(projected, doc);
    assert!(hydroini::render(&projected).unwrap().contains("TimeInterpolation = BlockTo"));
}
