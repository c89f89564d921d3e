//! Failure taxonomy of a lowering run

use pn_lower::LowerError;
use serde_json::{Value, json};
use std::io;
use std::path::PathBuf;

/// Everything that can stop a lowering run
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Input path does not exist
    #[error("File not found: {}", path.display())]
    MissingInput {
        /// Requested input path
        path: PathBuf,
    },

    /// Input path exists but cannot be read
    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        /// Requested input path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Input is not a syntax tree dump
    #[error("Invalid syntax tree: {0}")]
    Decode(#[source] serde_json::Error),

    /// Lowering rejected the tree
    #[error(transparent)]
    Lower(#[from] LowerError),

    /// Config file cannot be read
    #[error("Cannot read config {}: {source}", path.display())]
    ConfigRead {
        /// Config path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Config file is not valid
    #[error("Invalid config {}: {source}", path.display())]
    ConfigParse {
        /// Config path
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// Output tree cannot be serialized
    #[error("Cannot serialize output: {0}")]
    Encode(#[source] serde_json::Error),

    /// Output path cannot be written
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl DriverError {
    /// Classify a failed read of the input file
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingInput { path }
        } else {
            Self::Unreadable { path, source }
        }
    }

    /// Diagnostic category reported as the payload's `type`
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } | Self::Unreadable { .. } => "MissingInput",
            Self::Lower(err) if err.is_unsupported() => "UnsupportedConstruct",
            Self::Lower(_) => "StructuralViolation",
            Self::Decode(_)
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::Encode(_)
            | Self::Write { .. } => "PassFailure",
        }
    }

    /// Single-line JSON diagnostic for the process boundary
    ///
    /// A missing input file reports only the message.
    pub fn to_payload(&self) -> Value {
        match self {
            Self::MissingInput { .. } => json!({ "error": self.to_string() }),
            _ => json!({ "error": self.to_string(), "type": self.kind_label() }),
        }
    }
}
