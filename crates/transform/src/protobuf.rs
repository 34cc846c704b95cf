//! Simplified delimited encoding, the gRPC wire format.
//!
//! Stands in for generated protobuf classes: four `key:value` segments
//! joined by semicolons, with the payload rendered as compact JSON.

use bytes::Bytes;
use contracts::{ContractError, Record, Transformer};
use serde_json::Value;

pub struct ProtobufTransformer;

impl Transformer for ProtobufTransformer {
    fn format(&self) -> &str {
        "PROTOBUF"
    }

    fn transform(&self, record: &Record) -> Result<Bytes, ContractError> {
        let data = serde_json::to_string(&Value::Object(record.fields.clone()))
            .map_err(|e| ContractError::transform("PROTOBUF", e.to_string()))?;

        let encoded = format!(
            "id:{};timestamp:{};source:{};data:{}",
            record.id,
            record.created_at.to_rfc3339(),
            record.source_tag,
            data
        );
        Ok(Bytes::from(encoded))
    }
}
