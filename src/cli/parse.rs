//! CLI parse: clap types for whenctl. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// whenctl - inspect and replay declarative interaction policies
#[derive(Parser)]
#[command(name = "whenctl")]
#[command(about = "Inspect, resolve and replay declarative UI interaction policies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a policy argument list into top-level tokens
    Split {
        /// Argument text, with or without the surrounding parentheses
        args: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve context markers in a policy expression
    Resolve {
        /// Policy expression containing `_context_value(key)` markers
        policy: String,
        /// Context entry as key=value (repeatable)
        #[arg(long = "context", value_parser = parse_key_value)]
        context: Vec<(String, String)>,
    },
    /// Bind an element tree and replay an event script against it
    Replay {
        /// Element tree JSON file (fetched from the backend when omitted with --live)
        #[arg(long, required_unless_present = "live")]
        tree: Option<PathBuf>,
        /// Event script JSON file
        #[arg(long)]
        events: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Post callbacks to the configured backend instead of recording them
        #[arg(long)]
        live: bool,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Check that the configured backend answers
    Health,
}

/// Parse a `key=value` pair; the value may itself contain `=`
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}
