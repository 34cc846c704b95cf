//! Configuration validation
//!
//! Rules:
//! - source file path non-empty
//! - sink names unique and non-empty
//! - rate_limit > 0, timeout_ms > 0 for every sink
//! - backpressure.queue_capacity > 0
//! - monitoring interval > 0

use std::collections::HashSet;

use contracts::{ContractError, EngineConfig};

/// Validate a parsed EngineConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &EngineConfig) -> Result<(), ContractError> {
    validate_source(config)?;
    validate_sinks(config)?;
    validate_backpressure(config)?;
    validate_monitoring(config)?;
    Ok(())
}

fn validate_source(config: &EngineConfig) -> Result<(), ContractError> {
    if config.source.file_path.trim().is_empty() {
        return Err(ContractError::config_validation(
            "source.filePath",
            "source file path cannot be empty",
        ));
    }
    Ok(())
}

fn validate_sinks(config: &EngineConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in config.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.rate_limit == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].rateLimit", sink.name),
                "rateLimit must be > 0",
            ));
        }
        if sink.timeout_ms == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].timeoutMs", sink.name),
                "timeoutMs must be > 0",
            ));
        }
        if sink.transformation.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].transformation", sink.name),
                "transformation cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_backpressure(config: &EngineConfig) -> Result<(), ContractError> {
    if config.backpressure.queue_capacity == 0 {
        return Err(ContractError::config_validation(
            "backpressure.queueCapacity",
            "queueCapacity must be > 0",
        ));
    }
    Ok(())
}

fn validate_monitoring(config: &EngineConfig) -> Result<(), ContractError> {
    if config.monitoring.status_update_interval_seconds == 0 {
        return Err(ContractError::config_validation(
            "monitoring.statusUpdateIntervalSeconds",
            "statusUpdateIntervalSeconds must be > 0",
        ));
    }
    Ok(())
}
