//! Failure classification and diagnostic payloads

use expect_test::expect;
use integration_tests::Fixture;
use pn_driver::DriverError;
use serde_json::json;

fn lower_error(dump: &serde_json::Value) -> DriverError {
    let fixture = Fixture::new(&dump.to_string()).unwrap();
    let err = fixture.lower().unwrap_err();
    assert!(!fixture.output().exists(), "no output on failure");
    err
}

fn script(body: serde_json::Value) -> serde_json::Value {
    json!({"node": "Script", "body": body})
}

#[test]
fn test_unsupported_node_kind() {
    let err = lower_error(&script(json!([
        {"node": "Assign", "target": {"node": "Name", "id": "a"}, "value": {"node": "Constant", "value": 1}},
        {"node": "AugAssign", "target": {"node": "Name", "id": "a"}, "op": "Add", "value": {"node": "Constant", "value": 1}}
    ])));
    expect![[r#"{"error":"No visit method implemented for AugAssign","type":"UnsupportedConstruct"}"#]]
        .assert_eq(&err.to_payload().to_string());
}

#[test]
fn test_unsupported_operator() {
    let err = lower_error(&script(json!([{
        "node": "Expr",
        "value": {"node": "UnaryOp", "op": "Add", "operand": {"node": "Name", "id": "a"}}
    }])));
    expect![[r#"{"error":"Unary operator mapping not implemented for Add","type":"UnsupportedConstruct"}"#]]
        .assert_eq(&err.to_payload().to_string());
}

#[test]
fn test_chained_comparison() {
    let err = lower_error(&script(json!([{
        "node": "Expr",
        "value": {
            "node": "Compare",
            "left": {"node": "Name", "id": "a"},
            "ops": ["Lt", "Lt"],
            "comparators": [{"node": "Name", "id": "b"}, {"node": "Name", "id": "c"}]
        }
    }])));
    expect![[r#"{"error":"Compare supports exactly one operator and one comparator, found 2 and 2","type":"StructuralViolation"}"#]]
        .assert_eq(&err.to_payload().to_string());
}

#[test]
fn test_single_operand_bool_op() {
    let err = lower_error(&script(json!([{
        "node": "Expr",
        "value": {"node": "BoolOp", "op": "And", "values": [{"node": "Name", "id": "a"}]}
    }])));
    assert_eq!(err.kind_label(), "StructuralViolation");
    expect![[r#"BoolOp requires at least two values"#]].assert_eq(&err.to_string());
}

#[test]
fn test_unknown_node_class_is_pass_failure() {
    let err = lower_error(&script(json!([{"node": "Lambda"}])));
    assert_eq!(err.kind_label(), "PassFailure");
    assert!(matches!(err, DriverError::Decode(_)));
}

#[test]
fn test_missing_input_payload() {
    let fixture = Fixture::new("{}").unwrap();
    let absent = fixture.path().join("absent.json");
    let err = pn_driver::lower_file(&absent, fixture.output(), &Default::default()).unwrap_err();

    assert_eq!(err.kind_label(), "MissingInput");
    assert_eq!(
        err.to_payload(),
        json!({"error": format!("File not found: {}", absent.display())})
    );
}

#[test]
fn test_unwritable_output_is_pass_failure() {
    let fixture = Fixture::new(&script(json!([])).to_string()).unwrap();
    let input = fixture.path().join("ast.json");
    let output = fixture.path().join("missing-dir").join("estree.json");

    let err = pn_driver::lower_file(&input, &output, &Default::default()).unwrap_err();

    assert!(matches!(err, DriverError::Write { .. }));
    assert_eq!(err.kind_label(), "PassFailure");
}
