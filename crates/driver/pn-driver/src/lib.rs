//! Lowering driver
//!
//! Reads a syntax tree dump, lowers it, and writes the ESTree JSON. Every
//! failure is classified into a [`DriverError`] so the process boundary can
//! report it as one structured diagnostic.

pub mod error;

pub use error::DriverError;
pub use pn_lower::LowerConfig;

use pn_syntax::SourceNode;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Options for one lowering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerOptions {
    /// Names used by the lowering
    pub config: LowerConfig,
    /// Indent the output JSON by two spaces
    pub pretty: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            config: LowerConfig::default(),
            pretty: true,
        }
    }
}

/// Load a TOML config file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid config.
pub fn load_config(path: &Path) -> Result<LowerConfig, DriverError> {
    let text = fs::read_to_string(path).map_err(|source| DriverError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| DriverError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Lower a syntax tree dump to ESTree JSON text
///
/// # Errors
///
/// Returns an error if the input is not a syntax tree, contains a construct
/// with no lowering rule, or violates a lowering invariant.
pub fn lower_str(source: &str, options: &LowerOptions) -> Result<String, DriverError> {
    let tree: SourceNode = serde_json::from_str(source).map_err(DriverError::Decode)?;
    debug!(root = tree.kind(), "decoded syntax tree");

    let program = pn_lower::lower_program(&tree, &options.config)?;

    let encoded = if options.pretty {
        serde_json::to_string_pretty(&program)
    } else {
        serde_json::to_string(&program)
    };
    encoded.map_err(DriverError::Encode)
}

/// Lower the dump at `input` and write the result to `output`
///
/// Nothing is written unless lowering succeeds.
///
/// # Errors
///
/// See [`lower_str`]; also fails when `input` cannot be read or `output`
/// cannot be written.
pub fn lower_file(input: &Path, output: &Path, options: &LowerOptions) -> Result<(), DriverError> {
    info!(input = %input.display(), "reading syntax tree");
    let source = fs::read_to_string(input).map_err(|source| DriverError::read(input, source))?;

    let json = lower_str(&source, options)?;

    fs::write(output, json).map_err(|source| DriverError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    info!(output = %output.display(), "wrote ESTree");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    const ASSIGN_TWICE: &str = r#"{
        "node": "Script",
        "body": [
            {"node": "Assign", "target": {"node": "Name", "id": "x"}, "value": {"node": "Constant", "value": 1}},
            {"node": "ReAssign", "target": {"node": "Name", "id": "x"}, "value": {"node": "Constant", "value": 2}}
        ]
    }"#;

    #[test]
    fn test_lower_str_pretty() {
        let output = lower_str(ASSIGN_TWICE, &LowerOptions::default()).unwrap();
        assert!(output.starts_with("{\n  \"type\": \"Program\""));
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["body"][0]["kind"], json!("let"));
        assert_eq!(value["body"][1]["type"], json!("ExpressionStatement"));
    }

    #[test]
    fn test_lower_str_compact() {
        let options = LowerOptions {
            pretty: false,
            ..LowerOptions::default()
        };
        let output = lower_str(ASSIGN_TWICE, &options).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_lower_file_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ast.json");
        let output = dir.path().join("estree.json");
        fs::write(&input, ASSIGN_TWICE).unwrap();

        lower_file(&input, &output, &LowerOptions::default()).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["sourceType"], json!("module"));
    }

    #[test]
    fn test_failed_lowering_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ast.json");
        let output = dir.path().join("estree.json");
        fs::write(&input, r#"{"node": "Script", "body": [{"node": "Break"}]}"#).unwrap();

        let err = lower_file(&input, &output, &LowerOptions::default()).unwrap_err();

        assert_eq!(err.kind_label(), "UnsupportedConstruct");
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("absent.json");
        let output = dir.path().join("estree.json");

        let err = lower_file(&input, &output, &LowerOptions::default()).unwrap_err();

        assert!(matches!(err, DriverError::MissingInput { .. }));
        assert_eq!(
            err.to_payload(),
            json!({ "error": format!("File not found: {}", input.display()) })
        );
    }

    #[test]
    fn test_invalid_dump() {
        let err = lower_str("not json", &LowerOptions::default()).unwrap_err();
        assert_eq!(err.kind_label(), "PassFailure");
    }

    #[test]
    fn test_load_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pine-lower.toml");
        fs::write(&path, "global_namespace = \"ctx\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.global_namespace, "ctx");
        assert_eq!(config.param_prefix, "_param_");

        fs::write(&path, "global_namespace = 3\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(DriverError::ConfigParse { .. })
        ));
    }
}
