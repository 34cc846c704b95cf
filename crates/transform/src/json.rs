//! JSON envelope, the REST wire format

use bytes::Bytes;
use contracts::{ContractError, Record, Transformer};
use serde_json::json;

pub struct JsonTransformer;

impl Transformer for JsonTransformer {
    fn format(&self) -> &str {
        "JSON"
    }

    fn transform(&self, record: &Record) -> Result<Bytes, ContractError> {
        let envelope = json!({
            "id": record.id,
            "timestamp": record.created_at.to_rfc3339(),
            "source": record.source_tag,
            "data": record.fields,
        });
        let bytes = serde_json::to_vec(&envelope)
            .map_err(|e| ContractError::transform("JSON", e.to_string()))?;
        Ok(Bytes::from(bytes))
    }
}
