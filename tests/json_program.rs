use bitdecode::{Program, ProgramError};
use serde_json::json;

const TELEMETRY: &str = r#"{
    "fields": [
        { "type": "bits", "name": "testFirst", "width": 4,
          "reorder": [
              { "sourceStart": 2, "count": 1, "destStart": 0 },
              { "sourceStart": 3, "count": 1, "destStart": 1 },
              { "sourceStart": 0, "count": 2, "destStart": 2 }
          ] },
        { "type": "bits", "name": "testLast", "width": 4 },
        { "type": "int16", "name": "temperature" },
        { "type": "skip", "width": 8 },
        { "type": "ascii", "name": "station", "length": 3 }
    ]
}"#;

#[test]
fn decodes_record_from_json_program() {
    let program = Program::from_json(TELEMETRY).unwrap();
    let record = program.decode_hex("b1 ff 38 00 4b 52 41").unwrap();

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "testFirst": 14,
            "testLast": 1,
            "temperature": -200,
            "station": "KRA"
        })
    );
}

#[test]
fn record_serializes_in_program_order() {
    let program = Program::from_json(TELEMETRY).unwrap();
    let record = program.decode_hex("b1 ff 38 00 4b 52 41").unwrap();

    let text = serde_json::to_string(&record).unwrap();
    assert_eq!(
        text,
        r#"{"testFirst":14,"testLast":1,"temperature":-200,"station":"KRA"}"#
    );
}

#[test]
fn reorder_must_be_an_array() {
    let err = Program::from_json(
        r#"{ "fields": [{ "type": "bits", "name": "x", "width": 4, "reorder": 3 }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ProgramError::InvalidReorderSpec(_)));
}

#[test]
fn reorder_must_tile_the_window() {
    let err = Program::from_json(
        r#"{ "fields": [{ "type": "bits", "name": "x", "width": 8,
              "reorder": [{ "sourceStart": 0, "count": 4, "destStart": 0 }] }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ProgramError::InvalidReorderSpec(_)));
}

#[test]
fn malformed_json_is_reported() {
    let err = Program::from_json(r#"{ "fields": [ "#).unwrap_err();
    assert!(matches!(err, ProgramError::InvalidDefinition(_)));
}

#[test]
fn zero_length_text_rejected() {
    let err = Program::from_json(
        r#"{ "fields": [{ "type": "ascii", "name": "s", "length": 0 }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ProgramError::InvalidFieldWidth { .. }));
}
