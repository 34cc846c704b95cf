//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse YAML/JSON configuration files
//! - Validate configuration legality
//! - Produce an immutable `EngineConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("application.yaml")).unwrap();
//! println!("source: {}", config.source.file_path);
//! ```

mod parser;
mod validator;

pub use contracts::EngineConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.yaml / .yml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<EngineConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<EngineConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<EngineConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SinkKind, SourceType};

    const MINIMAL_YAML: &str = r#"
application:
  name: fanout-engine

source:
  type: CSV
  filePath: data/users.csv
  batchSize: 50

threadPool:
  type: VIRTUAL
  corePoolSize: 4
  maxPoolSize: 8

sinks:
  - name: rest-api
    type: REST
    enabled: true
    endpoint: https://api.example.com/ingest
    rateLimit: 50
    retryAttempts: 3
    timeoutMs: 2000
    transformation: JSON
  - name: kafka-events
    type: MQ
    enabled: false
    endpoint: kafka:9092
    topic: events
    transformation: XML

backpressure:
  queueCapacity: 200
  admissionTimeoutMs: 5000

monitoring:
  statusUpdateIntervalSeconds: 10

resilience:
  deadLetterQueueEnabled: true
  deadLetterPath: ./dead-letters
"#;

    #[test]
    fn test_load_from_str_yaml() {
        let result = ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.source.source_type, SourceType::Csv);
        assert_eq!(config.source.batch_size, 50);
        assert_eq!(config.sinks.len(), 2);
        assert_eq!(config.backpressure.queue_capacity, 200);
        assert_eq!(config.backpressure.admission_timeout_ms, 5000);
        assert!(config.resilience.dead_letter_queue_enabled);
    }

    #[test]
    fn test_enabled_sinks_filter() {
        let config = ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml).unwrap();
        let enabled: Vec<_> = config.enabled_sinks().collect();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "rest-api");
        assert_eq!(enabled[0].kind, SinkKind::Rest);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // Duplicate sink name should fail validation
        let content = r#"
source:
  type: CSV
  filePath: data/users.csv

sinks:
  - name: same
    type: REST
    endpoint: a
    transformation: JSON
  - name: same
    type: GRPC
    endpoint: b
    transformation: PROTOBUF
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_detect_format_rejects_unknown_extension() {
        let result = ConfigLoader::load_from_path(Path::new("config.toml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unsupported config format"));
    }
}
