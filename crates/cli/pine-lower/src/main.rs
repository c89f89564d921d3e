//! pine-lower CLI
//!
//! Lowers a Pine syntax tree dump to ESTree JSON. Failures are reported as a
//! single JSON line on stdout; logs go to stderr.

#![allow(clippy::print_stdout, reason = "Diagnostics are reported on stdout")]

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use pn_driver::{DriverError, LowerOptions};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: pine-lower <input_ast.json> <output_ast.json>";

/// Environment variable holding a log filter, overriding `-v`
const LOG_ENV: &str = "PINE_LOWER_LOG";

#[derive(Parser)]
#[command(name = "pine-lower")]
#[command(about = "Lower a Pine syntax tree to ESTree JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Syntax tree dump produced by the Pine parser
    input: PathBuf,

    /// Where to write the ESTree JSON
    output: PathBuf,

    /// TOML file overriding the runtime names
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            report(&json!({ "error": USAGE }));
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&payload(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli
        .config
        .as_deref()
        .map(pn_driver::load_config)
        .transpose()?
        .unwrap_or_default();
    let options = LowerOptions {
        config,
        pretty: !cli.compact,
    };

    pn_driver::lower_file(&cli.input, &cli.output, &options)?;
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn payload(err: &anyhow::Error) -> Value {
    err.downcast_ref::<DriverError>().map_or_else(
        || json!({ "error": err.to_string(), "type": "PassFailure" }),
        DriverError::to_payload,
    )
}

fn report(payload: &Value) {
    println!("{payload}");
}
