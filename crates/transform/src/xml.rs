//! XML envelope, the message-queue wire format

use bytes::Bytes;
use contracts::{ContractError, Record, Transformer};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

pub struct XmlTransformer;

impl Transformer for XmlTransformer {
    fn format(&self) -> &str {
        "XML"
    }

    fn transform(&self, record: &Record) -> Result<Bytes, ContractError> {
        let mut writer = Writer::new(Vec::new());

        write_open(&mut writer, "record")?;
        write_text_element(&mut writer, "id", &record.id)?;
        write_text_element(&mut writer, "timestamp", &record.created_at.to_rfc3339())?;
        write_text_element(&mut writer, "source", &record.source_tag)?;

        write_open(&mut writer, "data")?;
        for (key, value) in &record.fields {
            write_value(&mut writer, key, value)?;
        }
        write_close(&mut writer, "data")?;
        write_close(&mut writer, "record")?;

        Ok(Bytes::from(writer.into_inner()))
    }
}

fn write_value(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
) -> Result<(), ContractError> {
    match value {
        Value::Object(map) => {
            write_open(writer, name)?;
            for (key, inner) in map {
                write_value(writer, key, inner)?;
            }
            write_close(writer, name)?;
        }
        Value::Array(items) => {
            write_open(writer, name)?;
            for item in items {
                write_value(writer, "item", item)?;
            }
            write_close(writer, name)?;
        }
        Value::Null => {
            write_text_element(writer, name, "")?;
        }
        Value::String(s) => {
            write_text_element(writer, name, s)?;
        }
        other => {
            write_text_element(writer, name, &other.to_string())?;
        }
    }
    Ok(())
}

fn write_open(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), ContractError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| ContractError::transform("XML", e.to_string()))
}

fn write_close(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), ContractError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| ContractError::transform("XML", e.to_string()))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), ContractError> {
    write_open(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(|e| ContractError::transform("XML", e.to_string()))?;
    write_close(writer, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::FieldMap;
    use serde_json::json;

    #[test]
    fn test_envelope_tags_present() {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), json!("Test User"));
        fields.insert("email".into(), json!("test@example.com"));
        let record = Record::new(fields, "TEST");

        let bytes = XmlTransformer.transform(&record).unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(xml.starts_with("<record>"));
        assert!(xml.ends_with("</record>"));
        assert!(xml.contains(&format!("<id>{}</id>", record.id)));
        assert!(xml.contains("<source>TEST</source>"));
        assert!(xml.contains("<name>Test User</name>"));
    }

    #[test]
    fn test_nested_and_array_values() {
        let mut fields = FieldMap::new();
        fields.insert("user".into(), json!({"name": "alice"}));
        fields.insert("tags".into(), json!([1, 2]));
        let record = Record::new(fields, "TEST");

        let bytes = XmlTransformer.transform(&record).unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(xml.contains("<user><name>alice</name></user>"));
        assert!(xml.contains("<tags><item>1</item><item>2</item></tags>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let mut fields = FieldMap::new();
        fields.insert("note".into(), json!("a < b & c"));
        let record = Record::new(fields, "TEST");

        let bytes = XmlTransformer.transform(&record).unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(xml.contains("a &lt; b &amp; c"));
    }
}
