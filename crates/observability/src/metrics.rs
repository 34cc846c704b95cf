//! Processing metrics
//!
//! Lock-free counters fed from every dispatch task, plus per-sink rollups.
//! The collector never loses a count under concurrent recording; readers get
//! a consistent-enough snapshot without stopping writers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use contracts::{Outcome, ProcessingResult};
use metrics::{counter, histogram};

/// Run-wide metrics collector
///
/// One instance per engine run, shared by the orchestrator and every
/// dispatch task.
pub struct MetricsCollector {
    total_processed: AtomicU64,
    total_success: AtomicU64,
    total_failure: AtomicU64,
    total_retry: AtomicU64,
    admission_dropped: AtomicU64,

    sink_stats: RwLock<HashMap<String, Arc<SinkStats>>>,

    start: Instant,
    last_update_ms: AtomicU64,
    last_processed: AtomicU64,
}

#[derive(Default)]
struct SinkStats {
    success: AtomicU64,
    failure: AtomicU64,
    total_duration_ms: AtomicU64,
    attempts: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_processed: AtomicU64::new(0),
            total_success: AtomicU64::new(0),
            total_failure: AtomicU64::new(0),
            total_retry: AtomicU64::new(0),
            admission_dropped: AtomicU64::new(0),
            sink_stats: RwLock::new(HashMap::new()),
            start: Instant::now(),
            last_update_ms: AtomicU64::new(0),
            last_processed: AtomicU64::new(0),
        }
    }

    /// Record one (record, sink, attempt) result
    pub fn record_result(&self, result: &ProcessingResult) {
        self.total_processed.fetch_add(1, Ordering::Relaxed);

        let status = match result.outcome {
            Outcome::Success => {
                self.total_success.fetch_add(1, Ordering::Relaxed);
                "success"
            }
            Outcome::RetryableFailure => {
                self.total_retry.fetch_add(1, Ordering::Relaxed);
                "retry"
            }
            Outcome::PermanentFailure => {
                self.total_failure.fetch_add(1, Ordering::Relaxed);
                "failure"
            }
        };

        counter!(
            "fanout_results_total",
            "sink" => result.sink_name.clone(),
            "status" => status.to_string()
        )
        .increment(1);
        histogram!(
            "fanout_processing_duration_ms",
            "sink" => result.sink_name.clone()
        )
        .record(result.duration_ms as f64);

        self.sink(&result.sink_name).record(result);
    }

    /// Record a record dropped at admission
    pub fn record_admission_drop(&self) {
        self.admission_dropped.fetch_add(1, Ordering::Relaxed);
        counter!("fanout_admission_dropped_total").increment(1);
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed.load(Ordering::Relaxed)
    }

    pub fn total_success(&self) -> u64 {
        self.total_success.load(Ordering::Relaxed)
    }

    pub fn total_failure(&self) -> u64 {
        self.total_failure.load(Ordering::Relaxed)
    }

    pub fn total_retry(&self) -> u64 {
        self.total_retry.load(Ordering::Relaxed)
    }

    pub fn admission_dropped(&self) -> u64 {
        self.admission_dropped.load(Ordering::Relaxed)
    }

    /// Point-in-time view of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let processed = self.total_processed();

        let overall_throughput = if elapsed_ms > 0 {
            processed as f64 * 1000.0 / elapsed_ms as f64
        } else {
            0.0
        };

        let interval_ms = elapsed_ms.saturating_sub(self.last_update_ms.load(Ordering::Relaxed));
        let interval_count = processed.saturating_sub(self.last_processed.load(Ordering::Relaxed));
        let current_throughput = if interval_ms > 0 {
            interval_count as f64 * 1000.0 / interval_ms as f64
        } else {
            0.0
        };

        let mut per_sink: Vec<SinkSnapshot> = self
            .sink_stats
            .read()
            .map(|map| {
                map.iter()
                    .map(|(name, stats)| stats.snapshot(name))
                    .collect()
            })
            .unwrap_or_default();
        per_sink.sort_by(|a, b| a.name.cmp(&b.name));

        MetricsSnapshot {
            total_processed: processed,
            total_success: self.total_success(),
            total_failure: self.total_failure(),
            total_retry: self.total_retry(),
            admission_dropped: self.admission_dropped(),
            current_throughput,
            overall_throughput,
            per_sink,
        }
    }

    /// Render the status block and advance the interval window
    pub fn print_status(&self) {
        let snapshot = self.snapshot();
        self.last_update_ms
            .store(self.start.elapsed().as_millis() as u64, Ordering::Relaxed);
        self.last_processed
            .store(snapshot.total_processed, Ordering::Relaxed);
        println!("{snapshot}");
    }

    fn sink(&self, name: &str) -> Arc<SinkStats> {
        if let Ok(map) = self.sink_stats.read() {
            if let Some(stats) = map.get(name) {
                return Arc::clone(stats);
            }
        }
        match self.sink_stats.write() {
            Ok(mut map) => Arc::clone(map.entry(name.to_string()).or_default()),
            Err(poisoned) => Arc::clone(
                poisoned
                    .into_inner()
                    .entry(name.to_string())
                    .or_default(),
            ),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkStats {
    fn record(&self, result: &ProcessingResult) {
        match result.outcome {
            Outcome::Success => {
                self.success.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::PermanentFailure => {
                self.failure.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::RetryableFailure => {}
        }
        self.total_duration_ms
            .fetch_add(result.duration_ms, Ordering::Relaxed);
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, name: &str) -> SinkSnapshot {
        let attempts = self.attempts.load(Ordering::Relaxed);
        let total_duration_ms = self.total_duration_ms.load(Ordering::Relaxed);
        SinkSnapshot {
            name: name.to_string(),
            success: self.success.load(Ordering::Relaxed),
            failure: self.failure.load(Ordering::Relaxed),
            avg_duration_ms: if attempts > 0 {
                total_duration_ms as f64 / attempts as f64
            } else {
                0.0
            },
        }
    }
}

/// Point-in-time metrics view
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub total_processed: u64,
    pub total_success: u64,
    pub total_failure: u64,
    pub total_retry: u64,
    pub admission_dropped: u64,
    pub current_throughput: f64,
    pub overall_throughput: f64,
    pub per_sink: Vec<SinkSnapshot>,
}

/// Per-sink rollup
#[derive(Debug, Clone)]
pub struct SinkSnapshot {
    pub name: String,
    pub success: u64,
    pub failure: u64,
    pub avg_duration_ms: f64,
}

impl MetricsSnapshot {
    fn percentage(part: u64, total: u64) -> f64 {
        if total > 0 {
            part as f64 * 100.0 / total as f64
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "STATUS UPDATE")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "Total Processed:    {} records", self.total_processed)?;
        writeln!(
            f,
            "Success:            {} ({:.1}%)",
            self.total_success,
            Self::percentage(self.total_success, self.total_processed)
        )?;
        writeln!(
            f,
            "Failures:           {} ({:.1}%)",
            self.total_failure,
            Self::percentage(self.total_failure, self.total_processed)
        )?;
        writeln!(f, "Retries:            {}", self.total_retry)?;
        if self.admission_dropped > 0 {
            writeln!(f, "Admission Drops:    {}", self.admission_dropped)?;
        }
        writeln!(
            f,
            "Current Throughput: {:.2} records/sec",
            self.current_throughput
        )?;
        writeln!(
            f,
            "Overall Throughput: {:.2} records/sec",
            self.overall_throughput
        )?;
        writeln!(f, "{}", "-".repeat(80))?;
        writeln!(f, "Per-Sink Metrics:")?;
        for sink in &self.per_sink {
            writeln!(f, "  {}:", sink.name)?;
            writeln!(
                f,
                "    Success: {} | Failures: {} | Avg Time: {:.2}ms",
                sink.success, sink.failure, sink.avg_duration_ms
            )?;
        }
        writeln!(f, "{}", "=".repeat(80))
    }
}
