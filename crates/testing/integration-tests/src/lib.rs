//! Integration test utilities for pine-lower
//!
//! A [`Fixture`] holds a temporary directory with one syntax tree dump and
//! runs the full driver over it, the same way the CLI does.

use anyhow::Result;
use pn_driver::{DriverError, LowerOptions};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A syntax tree dump written to a temporary directory
#[derive(Debug)]
pub struct Fixture {
    dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Fixture {
    /// Write `dump` as the fixture's input file
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory or file cannot be created
    pub fn new(dump: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let input = dir.path().join("ast.json");
        let output = dir.path().join("estree.json");
        fs::write(&input, dump)?;
        Ok(Self { dir, input, output })
    }

    /// Directory holding the fixture files
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the output file
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the driver with default options
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged
    pub fn lower(&self) -> Result<Value, DriverError> {
        self.lower_with(&LowerOptions::default())
    }

    /// Run the driver and parse the written output
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged
    pub fn lower_with(&self, options: &LowerOptions) -> Result<Value, DriverError> {
        pn_driver::lower_file(&self.input, &self.output, options)?;
        let text = fs::read_to_string(&self.output)
            .map_err(|source| DriverError::read(&self.output, source))?;
        serde_json::from_str(&text).map_err(DriverError::Decode)
    }
}

/// Statement `index` of a lowered program's body
pub fn statement(program: &Value, index: usize) -> &Value {
    &program["body"][index]
}

/// Body statements of the arrow function bound by a `const` declaration
pub fn function_body(declaration: &Value) -> &Value {
    &declaration["declarations"][0]["init"]["body"]["body"]
}
