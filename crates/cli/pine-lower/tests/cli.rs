//! Process-boundary tests for the pine-lower binary

use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SCRIPT: &str = r#"{
    "node": "Script",
    "body": [
        {"node": "Assign", "target": {"node": "Name", "id": "x"}, "value": {"node": "Constant", "value": 1}}
    ]
}"#;

fn pine_lower(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pine-lower"))
        .args(args)
        .env_remove("PINE_LOWER_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_success_writes_output_and_nothing_on_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.json");
    let output = dir.path().join("estree.json");
    fs::write(&input, SCRIPT).unwrap();

    let result = pine_lower(&[input.as_path(), output.as_path()]);

    assert!(result.status.success());
    assert!(result.stdout.is_empty());
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\n  \"body\""));
    let value: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["body"][0]["declarations"][0]["id"]["name"], json!("x"));
}

#[test]
fn test_missing_arguments_prints_usage() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.json");

    let result = pine_lower(&[input.as_path()]);

    assert_eq!(result.status.code(), Some(1));
    assert_eq!(
        stdout_json(&result),
        json!({"error": "Usage: pine-lower <input_ast.json> <output_ast.json>"})
    );
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.json");
    let output = dir.path().join("estree.json");

    let result = pine_lower(&[input.as_path(), output.as_path()]);

    assert_eq!(result.status.code(), Some(1));
    assert_eq!(
        stdout_json(&result),
        json!({"error": format!("File not found: {}", input.display())})
    );
    assert!(!output.exists());
}

#[test]
fn test_unsupported_construct_reports_type() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.json");
    let output = dir.path().join("estree.json");
    fs::write(&input, r#"{"node": "Script", "body": [{"node": "ForIn"}]}"#).unwrap();

    let result = pine_lower(&[input.as_path(), output.as_path()]);

    assert_eq!(result.status.code(), Some(1));
    assert_eq!(
        stdout_json(&result),
        json!({"error": "No visit method implemented for ForIn", "type": "UnsupportedConstruct"})
    );
    assert!(!output.exists());
}

#[test]
fn test_invalid_dump_is_pass_failure() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.json");
    let output = dir.path().join("estree.json");
    fs::write(&input, "print('hello')").unwrap();

    let result = pine_lower(&[input.as_path(), output.as_path()]);

    assert_eq!(result.status.code(), Some(1));
    assert_eq!(stdout_json(&result)["type"], json!("PassFailure"));
}

#[test]
fn test_compact_and_config_flags() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ast.json");
    let output = dir.path().join("estree.json");
    let config = dir.path().join("pine-lower.toml");
    fs::write(
        &input,
        r#"{
            "node": "Script",
            "body": [
                {"node": "Assign", "target": {"node": "Name", "id": "n"}, "value": {"node": "Constant", "value": 1}},
                {"node": "FunctionDef", "name": "f", "args": [],
                 "body": [{"node": "Expr", "value": {"node": "Name", "id": "n"}}]}
            ]
        }"#,
    )
    .unwrap();
    fs::write(&config, "global_namespace = \"ctx\"\n").unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_pine-lower"))
        .arg(&input)
        .arg(&output)
        .arg("--compact")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(result.status.success());
    let written = fs::read_to_string(&output).unwrap();
    assert!(!written.contains('\n'));
    let value: Value = serde_json::from_str(&written).unwrap();
    let returned = &value["body"][1]["declarations"][0]["init"]["body"]["body"][0]["argument"];
    assert_eq!(returned["object"]["object"]["name"], json!("ctx"));
}
