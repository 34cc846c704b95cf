//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fan-Out Engine - concurrent record dispatch to independent sinks
#[derive(Parser, Debug)]
#[command(
    name = "fanout-engine",
    author,
    version,
    about = "Concurrent record fan-out engine",
    long_about = "Ingests structured records from a file source, transforms each record \n\
                  per destination format, and concurrently dispatches it to every enabled \n\
                  sink with per-sink rate limiting, timeouts and retry policies."
)]
pub struct Cli {
    /// Path to configuration file (YAML or JSON)
    #[arg(default_value = "application.yaml", env = "FANOUT_CONFIG")]
    pub config: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "FANOUT_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", env = "FANOUT_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
