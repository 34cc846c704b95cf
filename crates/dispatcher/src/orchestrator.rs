//! Fan-out orchestrator
//!
//! Pulls records from the source, gates them through the admission budget,
//! fans each one out to every enabled sink concurrently, escalates retries
//! per (record, sink) pair, routes permanent failures to the dead letter
//! queue and drives metrics.
//!
//! The admission budget is a concurrency limiter, not a processing queue:
//! a slot is held from admission until the record's fan-out, including any
//! retries, has reached a terminal outcome on every sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{ContractError, DataSink, EngineConfig, Outcome, Record, RecordSource};
use observability::MetricsCollector;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::dead_letter::DeadLetterQueue;

/// Orchestrator tuning, extracted from the engine configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Records concurrently admitted into dispatch
    pub queue_capacity: usize,
    /// How long an admission may wait for a slot before the record is dropped
    pub admission_timeout: Duration,
    /// Cadence of the periodic status report
    pub status_interval: Duration,
    /// How long shutdown waits for in-flight work before force-cancelling
    pub shutdown_grace: Duration,
}

impl OrchestratorConfig {
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self {
            queue_capacity: config.backpressure.queue_capacity,
            admission_timeout: Duration::from_millis(config.backpressure.admission_timeout_ms),
            status_interval: Duration::from_secs(
                config.monitoring.status_update_interval_seconds,
            ),
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

pub struct FanOutOrchestrator {
    config: OrchestratorConfig,
    context: DispatchContext,
    admission: Arc<Semaphore>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    accepting: AtomicBool,
    shutdown_started: AtomicBool,
    reporter: Mutex<Option<JoinHandle<()>>>,
}

/// Everything a dispatch task needs, cloned into each spawned fan-out
#[derive(Clone)]
struct DispatchContext {
    sinks: Arc<Vec<Arc<dyn DataSink>>>,
    metrics: Arc<MetricsCollector>,
    dead_letters: Arc<DeadLetterQueue>,
}

impl FanOutOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        sinks: Vec<Arc<dyn DataSink>>,
        metrics: Arc<MetricsCollector>,
        dead_letters: Arc<DeadLetterQueue>,
    ) -> Self {
        info!(sinks = sinks.len(), "fan-out orchestrator initialized");
        Self {
            admission: Arc::new(Semaphore::new(config.queue_capacity)),
            config,
            context: DispatchContext {
                sinks: Arc::new(sinks),
                metrics,
                dead_letters,
            },
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            accepting: AtomicBool::new(false),
            shutdown_started: AtomicBool::new(false),
            reporter: Mutex::new(None),
        }
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.context.metrics
    }

    /// Run the full pipeline to completion: source exhausted and all
    /// admitted work drained, then shut down.
    ///
    /// # Errors
    /// Sink initialization failure or a source read failure, both fatal.
    /// Per-record delivery failures never escape; they are resolved into
    /// metrics and dead letter entries.
    pub async fn start(&self, mut source: Box<dyn RecordSource>) -> Result<(), ContractError> {
        info!("starting fan-out engine");
        self.accepting.store(true, Ordering::SeqCst);

        for sink in self.context.sinks.iter() {
            sink.initialize().await?;
        }

        self.spawn_reporter();

        info!(source_type = %source.source_type(), "starting record processing");
        let pumped = self.pump(source.as_mut()).await;

        if let Err(e) = source.close() {
            warn!(error = %e, "failed to close source");
        }

        info!("finished reading records, waiting for in-flight work to drain");
        self.tracker.close();
        self.tracker.wait().await;
        debug!("in-flight work drained");

        self.shutdown().await;
        pumped
    }

    /// Stop the engine: close admissions, drain with a bounded grace period,
    /// force-cancel stragglers, shut down every sink, emit the final report.
    ///
    /// Idempotent and safe to call concurrently with `start` (e.g. from a
    /// termination signal); only the first call does any work.
    pub async fn shutdown(&self) {
        if self.shutdown_started.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("shutting down fan-out engine");

        self.accepting.store(false, Ordering::SeqCst);
        self.admission.close();

        let reporter = self
            .reporter
            .lock()
            .map(|mut slot| slot.take())
            .unwrap_or(None);
        if let Some(handle) = reporter {
            handle.abort();
        }

        self.tracker.close();
        if tokio::time::timeout(self.config.shutdown_grace, self.tracker.wait())
            .await
            .is_err()
        {
            warn!("grace period elapsed, cancelling in-flight dispatches");
            self.cancel.cancel();
            let _ = tokio::time::timeout(Duration::from_secs(1), self.tracker.wait()).await;
        }

        for sink in self.context.sinks.iter() {
            if let Err(e) = sink.shutdown().await {
                error!(sink = sink.name(), error = %e, "sink shutdown failed");
            }
        }

        self.context.metrics.print_status();
        info!(
            total_processed = self.context.metrics.total_processed(),
            success = self.context.metrics.total_success(),
            failures = self.context.metrics.total_failure(),
            "shutdown complete"
        );
    }

    /// Admission and dispatch loop, until the source ends or shutdown begins
    async fn pump(&self, source: &mut dyn RecordSource) -> Result<(), ContractError> {
        loop {
            if !self.accepting.load(Ordering::SeqCst) {
                return Ok(());
            }
            let Some(record) = source.next_record()? else {
                return Ok(());
            };
            self.admit(record).await;
        }
    }

    /// Offer one record to the admission gate; on timeout the record is
    /// dropped and counted, nothing else.
    async fn admit(&self, record: Record) {
        let acquire = Arc::clone(&self.admission).acquire_owned();
        let permit = match tokio::time::timeout(self.config.admission_timeout, acquire).await {
            Ok(Ok(permit)) => permit,
            // Closed gate means shutdown already started
            Ok(Err(_)) => return,
            Err(_) => {
                warn!(record_id = %record.id, "admission budget full, dropping record");
                self.context.metrics.record_admission_drop();
                return;
            }
        };

        let context = self.context.clone();
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            // Slot held until the whole fan-out, retries included, is done
            let _permit = permit;
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("dispatch cancelled during forced shutdown");
                }
                _ = context.dispatch_record(record) => {}
            }
        });
    }

    fn spawn_reporter(&self) {
        let metrics = Arc::clone(&self.context.metrics);
        let interval = self.config.status_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // immediate first tick is skipped
            loop {
                ticker.tick().await;
                metrics.print_status();
            }
        });
        if let Ok(mut slot) = self.reporter.lock() {
            *slot = Some(handle);
        }
    }
}

impl DispatchContext {
    /// Fan one record out to every sink concurrently and wait for all of
    /// them, including any per-sink retry chains, to reach a terminal state
    async fn dispatch_record(&self, record: Record) {
        let attempts = self
            .sinks
            .iter()
            .map(|sink| self.deliver_with_retries(Arc::clone(sink), record.clone()));
        futures::future::join_all(attempts).await;
    }

    /// Sequential retry chain for one (record, sink) pair. Retries go to the
    /// same named sink only, resolved by name each time; an unroutable retry
    /// is dropped with a logged anomaly.
    async fn deliver_with_retries(&self, sink: Arc<dyn DataSink>, record: Record) {
        let mut sink = sink;
        let mut record = record;
        loop {
            let result = sink.process(record).await;
            self.metrics.record_result(&result);

            match result.outcome {
                Outcome::Success => return,
                Outcome::PermanentFailure => {
                    error!(
                        record_id = %result.record.id,
                        sink = %result.sink_name,
                        "record failed permanently"
                    );
                    self.dead_letters.write_failed(&result);
                    return;
                }
                Outcome::RetryableFailure => {
                    let retried = result.record.with_incremented_retry();
                    info!(
                        record_id = %retried.id,
                        attempt = retried.retry_count,
                        sink = %result.sink_name,
                        "retrying record"
                    );
                    match self.sink_by_name(&result.sink_name) {
                        Some(next) => {
                            sink = next;
                            record = retried;
                        }
                        None => {
                            warn!(
                                record_id = %retried.id,
                                sink = %result.sink_name,
                                "retry targets a sink no longer in the active set, dropping"
                            );
                            return;
                        }
                    }
                }
            }
        }
    }

    fn sink_by_name(&self, name: &str) -> Option<Arc<dyn DataSink>> {
        self.sinks.iter().find(|s| s.name() == name).cloned()
    }
}
