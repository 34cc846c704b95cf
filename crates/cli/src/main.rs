//! # Fan-Out Engine CLI
//!
//! Command line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - Worker pool construction from configuration
//! - Engine lifecycle and graceful shutdown handling

mod app;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::Cli;
use observability::ObservabilityConfig;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Fan-Out Engine starting"
    );

    if !cli.config.exists() {
        anyhow::bail!("Configuration file not found: {}", cli.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    info!(
        source = %config.source.file_path,
        sinks = config.sinks.len(),
        enabled_sinks = config.enabled_sinks().count(),
        "Configuration loaded"
    );

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        app::print_config_summary(&config);
        return Ok(());
    }

    let runtime = app::build_runtime(&config.thread_pool)?;
    let result = runtime.block_on(app::run(config));

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Run failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: default_log_level.to_string(),
    })
}
