//! EngineConfig - Config Loader output
//!
//! Describes the complete engine configuration: source, thread pool, sinks,
//! backpressure, monitoring and resilience. Immutable once loaded; constructed
//! at startup and passed by reference into the orchestrator and every sink.

use serde::{Deserialize, Serialize};

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Free-form application metadata, not interpreted by the core
    #[serde(default)]
    pub application: serde_json::Value,

    /// Record source settings
    pub source: SourceConfig,

    /// Worker pool discipline
    #[serde(default)]
    pub thread_pool: ThreadPoolConfig,

    /// Delivery destinations
    pub sinks: Vec<SinkDescriptor>,

    /// Admission control settings
    #[serde(default)]
    pub backpressure: BackpressureConfig,

    /// Status reporting settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Dead-letter settings
    #[serde(default)]
    pub resilience: ResilienceConfig,
}

impl EngineConfig {
    /// Sinks that will actually receive traffic
    pub fn enabled_sinks(&self) -> impl Iterator<Item = &SinkDescriptor> {
        self.sinks.iter().filter(|s| s.enabled)
    }
}

/// Record source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Source file format
    #[serde(rename = "type")]
    pub source_type: SourceType,

    /// Path to the input file
    pub file_path: String,

    /// Read batch hint (reserved; sources stream record-by-record)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    100
}

/// Source file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "JSONL")]
    Jsonl,
    /// Recognized but unsupported; must fail at startup
    #[serde(rename = "FIXED_WIDTH")]
    FixedWidth,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Jsonl => write!(f, "JSONL"),
            Self::FixedWidth => write!(f, "FIXED_WIDTH"),
        }
    }
}

/// Worker pool discipline.
///
/// Kept as a free-form tag: an unrecognized value falls back to the
/// lightweight-task default with a warning, never a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPoolConfig {
    /// One of VIRTUAL | FORK_JOIN | FIXED (case-insensitive)
    #[serde(rename = "type", default = "default_pool_type")]
    pub pool_type: String,

    #[serde(default = "default_core_pool_size")]
    pub core_pool_size: usize,

    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
}

fn default_pool_type() -> String {
    "VIRTUAL".to_string()
}

fn default_core_pool_size() -> usize {
    4
}

fn default_max_pool_size() -> usize {
    8
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            pool_type: default_pool_type(),
            core_pool_size: default_core_pool_size(),
            max_pool_size: default_max_pool_size(),
        }
    }
}

/// Per-sink configuration, read-only at runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkDescriptor {
    /// Unique name, the sole lookup key for retry routing
    pub name: String,

    /// Destination kind
    #[serde(rename = "type")]
    pub kind: SinkKind,

    /// Disabled sinks are never dispatched to
    #[serde(default)]
    pub enabled: bool,

    /// Destination address
    pub endpoint: String,

    /// Permits per second for this sink's own throttle
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    /// Maximum retries before a failure becomes permanent
    #[serde(default)]
    pub retry_attempts: u32,

    /// Upper bound on a single send
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Transformer format name (open set, resolved via the registry)
    pub transformation: String,

    /// MQ addressing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Wide-column addressing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

fn default_rate_limit() -> u32 {
    100
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Destination kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkKind {
    #[serde(rename = "REST")]
    Rest,
    #[serde(rename = "GRPC")]
    Grpc,
    #[serde(rename = "MQ")]
    MessageQueue,
    #[serde(rename = "DB")]
    WideColumn,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "REST"),
            Self::Grpc => write!(f, "GRPC"),
            Self::MessageQueue => write!(f, "MQ"),
            Self::WideColumn => write!(f, "DB"),
        }
    }
}

/// Admission control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpressureConfig {
    /// In-flight budget: records concurrently admitted into dispatch
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How long an admission offer may block before the record is dropped
    #[serde(default = "default_admission_timeout_ms")]
    pub admission_timeout_ms: u64,
}

fn default_queue_capacity() -> usize {
    100
}

fn default_admission_timeout_ms() -> u64 {
    10_000
}

impl Default for BackpressureConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            admission_timeout_ms: default_admission_timeout_ms(),
        }
    }
}

/// Status reporting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringConfig {
    #[serde(default = "default_status_interval")]
    pub status_update_interval_seconds: u64,
}

fn default_status_interval() -> u64 {
    10
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            status_update_interval_seconds: default_status_interval(),
        }
    }
}

/// Dead-letter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResilienceConfig {
    #[serde(default)]
    pub dead_letter_queue_enabled: bool,

    #[serde(default = "default_dead_letter_path")]
    pub dead_letter_path: String,
}

fn default_dead_letter_path() -> String {
    "./dead-letters".to_string()
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            dead_letter_queue_enabled: false,
            dead_letter_path: default_dead_letter_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_descriptor_camel_case_yaml() {
        let yaml = r#"
name: rest-api
type: REST
enabled: true
endpoint: https://api.example.com/ingest
rateLimit: 50
retryAttempts: 3
timeoutMs: 2000
transformation: JSON
"#;
        let d: SinkDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(d.name, "rest-api");
        assert_eq!(d.kind, SinkKind::Rest);
        assert!(d.enabled);
        assert_eq!(d.rate_limit, 50);
        assert_eq!(d.retry_attempts, 3);
        assert_eq!(d.timeout_ms, 2000);
        assert_eq!(d.transformation, "JSON");
        assert!(d.topic.is_none());
    }

    #[test]
    fn test_unknown_sink_kind_fails_to_parse() {
        let yaml = r#"
name: bad
type: FOO
endpoint: nowhere
transformation: JSON
"#;
        let result: Result<SinkDescriptor, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_enabled_defaults_to_false() {
        let yaml = r#"
name: dormant
type: MQ
endpoint: kafka:9092
transformation: XML
topic: events
"#;
        let d: SinkDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert!(!d.enabled);
        assert_eq!(d.topic.as_deref(), Some("events"));
    }

    #[test]
    fn test_defaults() {
        let bp = BackpressureConfig::default();
        assert_eq!(bp.queue_capacity, 100);
        assert_eq!(bp.admission_timeout_ms, 10_000);

        let tp = ThreadPoolConfig::default();
        assert_eq!(tp.pool_type, "VIRTUAL");

        let mon = MonitoringConfig::default();
        assert_eq!(mon.status_update_interval_seconds, 10);
    }
}
