//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

use alertcheck_harness::ThresholdType;

/// alertcheck -- drive a Graylog alert test harness one step at a time.
///
/// Use `alertcheck <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "alertcheck", version, about, long_about = None)]
pub struct Cli {
    /// Path to the alertcheck.toml configuration file.
    #[arg(short, long, default_value = "alertcheck.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait until the server reports its deflector is up.
    Wait,

    /// Create a GELF TCP input and wait until it is running.
    Input,

    /// Create an aggregation-count event definition.
    Rule(RuleArgs),

    /// Send one GELF event to the intake address.
    Send(SendArgs),

    /// Print the number of events the server has recorded.
    Events,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- rule ----

/// Aggregation rule definition.
#[derive(Args, Debug)]
pub struct RuleArgs {
    /// Event definition title.
    #[arg(long)]
    pub title: String,

    /// Threshold comparison (MORE or LESS).
    #[arg(long)]
    pub threshold_type: ThresholdType,

    /// Threshold value compared against the count.
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: i64,

    /// Grouping field (repeatable).
    #[arg(long = "group")]
    pub group: Vec<String>,

    /// Distinct field (repeatable).
    #[arg(long = "distinct")]
    pub distinct: Vec<String>,

    /// Search window and execution interval, in seconds.
    #[arg(long, default_value_t = 5)]
    pub period: u64,
}

// ---- send ----

/// One GELF event built from `key=value` pairs.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Event field as key=value; the value is parsed as JSON, else kept as a string.
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

/// Parse `key=value` into a field name and a JSON value.
///
/// `_port=80` yields the number 80, `note=hello` yields the string "hello".
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field '{}', expected key=value", raw))?;
    if key.is_empty() {
        return Err(format!("invalid field '{}', key must not be empty", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

// ---- config ----

/// Manage alertcheck configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, server, api, intake, polling).
        #[arg(long)]
        section: Option<String>,
    },
}
