//! Avro binary record, the wide-column wire format.
//!
//! Encodes the fixed schema `{id, timestamp, source, payload}` where every
//! field is an Avro string: zig-zag varint length followed by UTF-8 bytes.
//! The payload is the record's field map as compact JSON.

use bytes::Bytes;
use contracts::{ContractError, Record, Transformer};
use serde_json::Value;

pub struct AvroTransformer;

impl Transformer for AvroTransformer {
    fn format(&self) -> &str {
        "AVRO"
    }

    fn transform(&self, record: &Record) -> Result<Bytes, ContractError> {
        let payload = serde_json::to_string(&Value::Object(record.fields.clone()))
            .map_err(|e| ContractError::transform("AVRO", e.to_string()))?;

        let mut out = Vec::new();
        write_avro_string(&mut out, &record.id);
        write_avro_string(&mut out, &record.created_at.to_rfc3339());
        write_avro_string(&mut out, &record.source_tag);
        write_avro_string(&mut out, &payload);
        Ok(Bytes::from(out))
    }
}

fn write_avro_string(out: &mut Vec<u8>, s: &str) {
    write_avro_long(out, s.len() as i64);
    out.extend_from_slice(s.as_bytes());
}

/// Avro long: zig-zag then little-endian base-128 varint
fn write_avro_long(out: &mut Vec<u8>, value: i64) {
    let mut encoded = ((value << 1) ^ (value >> 63)) as u64;
    loop {
        let byte = (encoded & 0x7f) as u8;
        encoded >>= 7;
        if encoded == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::FieldMap;
    use serde_json::json;

    fn read_avro_string(buf: &[u8]) -> (String, &[u8]) {
        let mut value: u64 = 0;
        let mut shift = 0;
        let mut idx = 0;
        loop {
            let byte = buf[idx];
            value |= u64::from(byte & 0x7f) << shift;
            idx += 1;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        let len = ((value >> 1) as i64 ^ -((value & 1) as i64)) as usize;
        let s = String::from_utf8(buf[idx..idx + len].to_vec()).unwrap();
        (s, &buf[idx + len..])
    }

    #[test]
    fn test_four_field_layout() {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), json!("Alice"));
        let record = Record::new(fields, "TEST");

        let bytes = AvroTransformer.transform(&record).unwrap();

        let (id, rest) = read_avro_string(&bytes);
        let (timestamp, rest) = read_avro_string(rest);
        let (source, rest) = read_avro_string(rest);
        let (payload, rest) = read_avro_string(rest);

        assert_eq!(id, record.id);
        assert_eq!(timestamp, record.created_at.to_rfc3339());
        assert_eq!(source, "TEST");
        assert_eq!(payload, "{\"name\":\"Alice\"}");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_varint_crosses_one_byte_boundary() {
        let mut out = Vec::new();
        write_avro_long(&mut out, 64);
        assert_eq!(out, vec![0x80, 0x01]);

        let mut out = Vec::new();
        write_avro_long(&mut out, 63);
        assert_eq!(out, vec![0x7e]);
    }
}
