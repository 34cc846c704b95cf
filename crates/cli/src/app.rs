//! Engine assembly and run loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::{EngineConfig, ThreadPoolConfig};
use dispatcher::{DeadLetterQueue, FanOutOrchestrator, OrchestratorConfig};
use observability::MetricsCollector;
use transform::TransformerRegistry;
use tracing::{info, warn};

/// Build the worker pool described by the configuration.
///
/// `VIRTUAL` maps to the default task-per-unit scheduler; `FORK_JOIN` and
/// `FIXED` bound the pool to `maxPoolSize` workers, with `FIXED` also
/// capping the blocking pool. An unknown tag falls back to `VIRTUAL` with
/// a warning, never an error.
pub fn build_runtime(config: &ThreadPoolConfig) -> Result<tokio::runtime::Runtime> {
    let pool_type = config.pool_type.to_uppercase();
    info!(pool_type = %pool_type, "creating worker pool");

    let runtime = match pool_type.as_str() {
        "VIRTUAL" => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build(),
        "FORK_JOIN" => tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.max_pool_size.max(1))
            .enable_all()
            .build(),
        "FIXED" => tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.max_pool_size.max(1))
            .max_blocking_threads(config.max_pool_size.max(1))
            .enable_all()
            .build(),
        other => {
            warn!(pool_type = %other, "unknown pool type, defaulting to VIRTUAL");
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
        }
    };

    runtime.context("Failed to build worker pool")
}

/// Assemble the engine from configuration and run it to completion or until
/// a termination signal arrives.
pub async fn run(config: EngineConfig) -> Result<()> {
    let registry = TransformerRegistry::with_defaults();
    let sink_list = sinks::build_sinks(&config, &registry)?;
    if sink_list.is_empty() {
        warn!("no sinks are enabled, records will be read and discarded");
    }

    let metrics = Arc::new(MetricsCollector::new());
    let dead_letters = Arc::new(DeadLetterQueue::new(
        &config.resilience.dead_letter_path,
        config.resilience.dead_letter_queue_enabled,
    ));

    let orchestrator = Arc::new(FanOutOrchestrator::new(
        OrchestratorConfig::from_engine_config(&config),
        sink_list,
        metrics,
        dead_letters,
    ));

    let source = ingestion::create_source(&config.source)?;

    tokio::select! {
        result = orchestrator.start(source) => {
            result.context("Engine run failed")?;
        }
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping engine...");
            orchestrator.shutdown().await;
        }
    }

    info!("Fan-Out Engine finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
pub fn print_config_summary(config: &EngineConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Source:");
    println!("  Type: {}", config.source.source_type);
    println!("  File: {}", config.source.file_path);

    println!("\nWorker Pool:");
    println!(
        "  {} (core {}, max {})",
        config.thread_pool.pool_type, config.thread_pool.core_pool_size, config.thread_pool.max_pool_size
    );

    println!("\nSinks ({}):", config.sinks.len());
    for sink in &config.sinks {
        println!(
            "  - {} ({}) {} rate={}rps retries={} timeout={}ms format={}",
            sink.name,
            sink.kind,
            if sink.enabled { "enabled" } else { "disabled" },
            sink.rate_limit,
            sink.retry_attempts,
            sink.timeout_ms,
            sink.transformation
        );
    }

    println!("\nBackpressure:");
    println!(
        "  Capacity: {} | Admission timeout: {}ms",
        config.backpressure.queue_capacity, config.backpressure.admission_timeout_ms
    );

    println!("\nResilience:");
    println!(
        "  Dead letter queue: {} ({})",
        if config.resilience.dead_letter_queue_enabled {
            "enabled"
        } else {
            "disabled"
        },
        config.resilience.dead_letter_path
    );

    println!();
}
