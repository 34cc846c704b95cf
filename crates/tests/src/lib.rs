//! # Integration Tests
//!
//! End-to-end runs of the engine without real networks.
//!
//! Covers:
//! - File source through orchestrator to sinks with deterministic transports
//! - Dead letter persistence shape
//! - Startup failure on invalid configuration

#[cfg(test)]
mod support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use contracts::{ContractError, Record, SinkDescriptor, SinkKind};
    use sinks::Transport;

    /// Deterministic transport: a scripted prefix of failures, then a fixed
    /// outcome for every later send
    pub struct ScriptedTransport {
        script: Mutex<VecDeque<bool>>,
        default_ok: bool,
    }

    impl ScriptedTransport {
        pub fn always_ok() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                default_ok: true,
            }
        }

        pub fn always_fail() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                default_ok: false,
            }
        }

        pub fn fail_times(n: usize) -> Self {
            Self {
                script: Mutex::new(std::iter::repeat(false).take(n).collect()),
                default_ok: true,
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn connect(&self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn send(&self, _payload: &Bytes, _record: &Record) -> Result<(), ContractError> {
            let ok = self
                .script
                .lock()
                .map(|mut script| script.pop_front().unwrap_or(self.default_ok))
                .unwrap_or(self.default_ok);
            if ok {
                Ok(())
            } else {
                Err(ContractError::sink_send("scripted", "scripted send failure"))
            }
        }

        async fn close(&self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    pub fn descriptor(
        name: &str,
        kind: SinkKind,
        retry_attempts: u32,
        transformation: &str,
    ) -> SinkDescriptor {
        SinkDescriptor {
            name: name.into(),
            kind,
            enabled: true,
            endpoint: "test://".into(),
            rate_limit: 10_000,
            retry_attempts,
            timeout_ms: 5_000,
            transformation: transformation.into(),
            topic: None,
            keyspace: None,
            table: None,
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{DataSink, SinkKind};
    use dispatcher::{DeadLetterQueue, FanOutOrchestrator, OrchestratorConfig};
    use ingestion::CsvSource;
    use observability::MetricsCollector;
    use sinks::{SinkRuntime, Transport};
    use transform::TransformerRegistry;

    use crate::support::{descriptor, ScriptedTransport};

    fn csv_fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn scripted_sink(
        name: &str,
        kind: SinkKind,
        retry_attempts: u32,
        transformation: &str,
        transport: ScriptedTransport,
    ) -> Arc<dyn DataSink> {
        let registry = TransformerRegistry::with_defaults();
        let transformer = registry.get(transformation).unwrap();
        Arc::new(SinkRuntime::new(
            descriptor(name, kind, retry_attempts, transformation),
            transformer,
            Box::new(transport) as Box<dyn Transport>,
        ))
    }

    fn engine(
        sinks: Vec<Arc<dyn DataSink>>,
        dlq_dir: &Path,
    ) -> Arc<FanOutOrchestrator> {
        Arc::new(FanOutOrchestrator::new(
            OrchestratorConfig {
                queue_capacity: 50,
                admission_timeout: Duration::from_secs(1),
                status_interval: Duration::from_secs(3600),
                shutdown_grace: Duration::from_secs(5),
            },
            sinks,
            Arc::new(MetricsCollector::new()),
            Arc::new(DeadLetterQueue::new(dlq_dir, true)),
        ))
    }

    fn dlq_entries(dir: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(dir.join("failed-records.jsonl"))
            .map(|content| {
                content
                    .lines()
                    .map(|line| serde_json::from_str(line).unwrap())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// CSV source -> orchestrator -> two healthy sinks
    #[tokio::test]
    async fn test_csv_fan_out_to_all_sinks() {
        let file = csv_fixture("name,email\nAlice,a@x.com\nBob,b@x.com\nCarol,c@x.com\n");
        let dlq = tempfile::tempdir().unwrap();

        let orch = engine(
            vec![
                scripted_sink("rest", SinkKind::Rest, 3, "JSON", ScriptedTransport::always_ok()),
                scripted_sink("db", SinkKind::WideColumn, 3, "AVRO", ScriptedTransport::always_ok()),
            ],
            dlq.path(),
        );
        let source = CsvSource::open(file.path()).unwrap();

        orch.start(Box::new(source)).await.unwrap();

        let metrics = orch.metrics();
        assert_eq!(metrics.total_processed(), 6);
        assert_eq!(metrics.total_success(), 6);
        assert_eq!(metrics.total_failure(), 0);
        assert!(dlq_entries(dlq.path()).is_empty());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.per_sink.len(), 2);
        assert!(snapshot.per_sink.iter().all(|s| s.success == 3));
    }

    /// One record, one REST sink with retryAttempts=0 and a send that always
    /// fails: one permanent failure and one dead letter entry carrying the
    /// original fields
    #[tokio::test]
    async fn test_single_record_permanent_failure_scenario() {
        let file = csv_fixture("name,email\nAlice,a@x.com\n");
        let dlq = tempfile::tempdir().unwrap();

        let orch = engine(
            vec![scripted_sink(
                "rest-api",
                SinkKind::Rest,
                0,
                "JSON",
                ScriptedTransport::always_fail(),
            )],
            dlq.path(),
        );
        let source = CsvSource::open(file.path()).unwrap();

        orch.start(Box::new(source)).await.unwrap();

        let metrics = orch.metrics();
        assert_eq!(metrics.total_failure(), 1);
        assert_eq!(metrics.total_success(), 0);
        assert_eq!(metrics.total_retry(), 0);

        let entries = dlq_entries(dlq.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["sinkName"], "rest-api");
        assert_eq!(entries[0]["retryCount"], 0);
        assert_eq!(entries[0]["originalData"]["name"], "Alice");
        assert_eq!(entries[0]["originalData"]["email"], "a@x.com");
    }

    /// Two transient failures, then success: the record recovers within its
    /// retry budget and never reaches the dead letter queue
    #[tokio::test]
    async fn test_transient_failures_recover_within_budget() {
        let file = csv_fixture("name\nAlice\n");
        let dlq = tempfile::tempdir().unwrap();

        let orch = engine(
            vec![scripted_sink(
                "flaky",
                SinkKind::Grpc,
                3,
                "PROTOBUF",
                ScriptedTransport::fail_times(2),
            )],
            dlq.path(),
        );
        let source = CsvSource::open(file.path()).unwrap();

        orch.start(Box::new(source)).await.unwrap();

        let metrics = orch.metrics();
        assert_eq!(metrics.total_retry(), 2);
        assert_eq!(metrics.total_success(), 1);
        assert_eq!(metrics.total_failure(), 0);
        assert!(dlq_entries(dlq.path()).is_empty());
    }

    /// Retry budget exhausted through the real sink runtime: attempts are
    /// initial + retryAttempts, the dead letter entry records the final count
    #[tokio::test]
    async fn test_retry_budget_exhaustion_through_real_sink() {
        let file = csv_fixture("name\nAlice\n");
        let dlq = tempfile::tempdir().unwrap();

        let orch = engine(
            vec![scripted_sink(
                "flaky",
                SinkKind::MessageQueue,
                2,
                "XML",
                ScriptedTransport::always_fail(),
            )],
            dlq.path(),
        );
        let source = CsvSource::open(file.path()).unwrap();

        orch.start(Box::new(source)).await.unwrap();

        let metrics = orch.metrics();
        assert_eq!(metrics.total_retry(), 2);
        assert_eq!(metrics.total_failure(), 1);
        assert_eq!(metrics.total_processed(), 3);

        let entries = dlq_entries(dlq.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["retryCount"], 2);
    }
}

#[cfg(test)]
mod startup_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, SourceConfig, SourceType};

    /// Unknown sink type in configuration fails before any record is read
    #[test]
    fn test_unknown_sink_type_fails_at_startup() {
        let yaml = r#"
source:
  type: CSV
  filePath: data/users.csv

sinks:
  - name: mystery
    type: FOO
    endpoint: nowhere
    transformation: JSON
"#;
        let result = ConfigLoader::load_from_str(yaml, ConfigFormat::Yaml);
        assert!(result.is_err());
    }

    /// FIXED_WIDTH is recognized but unsupported, failing at startup
    #[test]
    fn test_fixed_width_source_fails_at_startup() {
        let config = SourceConfig {
            source_type: SourceType::FixedWidth,
            file_path: "data/records.dat".into(),
            batch_size: 100,
        };
        let err = ingestion::create_source(&config).unwrap_err();
        assert!(matches!(err, ContractError::UnsupportedSource { .. }));
    }

    /// Unknown transformation format fails sink construction, not first record
    #[test]
    fn test_unknown_transformation_fails_sink_construction() {
        let registry = transform::TransformerRegistry::with_defaults();
        let descriptor = crate::support::descriptor("s", contracts::SinkKind::Rest, 0, "THRIFT");
        assert!(sinks::create_sink(&descriptor, &registry).is_err());
    }
}
