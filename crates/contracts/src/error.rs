//! Layered error definitions
//!
//! Categorized by source: config / source / transform / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Source Errors =====
    /// Recognized but unimplemented source type
    #[error("source type '{source_type}' is not implemented")]
    UnsupportedSource { source_type: String },

    /// Record read/parse error
    #[error("source read error: {message}")]
    SourceRead { message: String },

    // ===== Transform Errors =====
    /// Unknown transformation format name
    #[error("unknown transformation format: {format}")]
    UnknownFormat { format: String },

    /// Transformation failure
    #[error("{format} transform error: {message}")]
    Transform { format: String, message: String },

    // ===== Sink Errors =====
    /// Sink initialization error (fatal at startup)
    #[error("sink '{sink_name}' initialization error: {message}")]
    SinkInit { sink_name: String, message: String },

    /// Sink delivery error
    #[error("sink '{sink_name}' send error: {message}")]
    SinkSend { sink_name: String, message: String },

    /// Sink delivery timed out
    #[error("sink '{sink_name}' send timed out after {timeout_ms}ms")]
    SinkTimeout { sink_name: String, timeout_ms: u64 },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source read error
    pub fn source_read(message: impl Into<String>) -> Self {
        Self::SourceRead {
            message: message.into(),
        }
    }

    /// Create transformation error
    pub fn transform(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create sink initialization error
    pub fn sink_init(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkInit {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink send error
    pub fn sink_send(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkSend {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
