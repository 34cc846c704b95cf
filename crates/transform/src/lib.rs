//! # Transform
//!
//! Record-to-bytes encoding strategies and their registry.
//!
//! Responsibilities:
//! - One encoder per wire format (JSON, XML, PROTOBUF, AVRO)
//! - Case-insensitive lookup by format name
//! - Extension point for custom formats

mod avro;
mod json;
mod protobuf;
mod xml;

pub use avro::AvroTransformer;
pub use json::JsonTransformer;
pub use protobuf::ProtobufTransformer;
pub use xml::XmlTransformer;

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{ContractError, Transformer};

/// Registry of transformers, keyed by upper-cased format name.
///
/// Built once at startup; sinks resolve their encoder here during
/// construction, so an unknown format fails before any record flows.
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Registry with the four built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonTransformer));
        registry.register(Arc::new(XmlTransformer));
        registry.register(Arc::new(ProtobufTransformer));
        registry.register(Arc::new(AvroTransformer));
        registry
    }

    /// Register a transformer under its own format name
    pub fn register(&mut self, transformer: Arc<dyn Transformer>) {
        self.transformers
            .insert(transformer.format().to_uppercase(), transformer);
    }

    /// Look up a transformer by format name, case-insensitively.
    ///
    /// # Errors
    /// Unknown format.
    pub fn get(&self, format: &str) -> Result<Arc<dyn Transformer>, ContractError> {
        self.transformers
            .get(&format.to_uppercase())
            .cloned()
            .ok_or_else(|| ContractError::UnknownFormat {
                format: format.to_string(),
            })
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
