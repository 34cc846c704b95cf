//! CSV record source
//!
//! First row is the header; every following row becomes one record with the
//! header names as field keys and all values kept as strings.

use std::fs::File;
use std::path::Path;

use contracts::{ContractError, FieldMap, Record, RecordSource, SourceType};
use csv::StringRecord;
use serde_json::Value;
use tracing::debug;

pub struct CsvSource {
    reader: Option<csv::Reader<File>>,
    headers: StringRecord,
    source_tag: String,
}

impl CsvSource {
    /// Open a CSV file and read its header row.
    ///
    /// # Errors
    /// File open or header read failure.
    pub fn open(path: &Path) -> Result<Self, ContractError> {
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| ContractError::source_read(format!("CSV header read error: {e}")))?
            .clone();

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(file = %file_name, columns = headers.len(), "opened CSV source");

        Ok(Self {
            reader: Some(reader),
            headers,
            source_tag: format!("CSV:{file_name}"),
        })
    }
}

impl RecordSource for CsvSource {
    fn source_type(&self) -> SourceType {
        SourceType::Csv
    }

    fn next_record(&mut self) -> Result<Option<Record>, ContractError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut row = StringRecord::new();
        match reader.read_record(&mut row) {
            Ok(true) => {
                let mut fields = FieldMap::new();
                for (header, value) in self.headers.iter().zip(row.iter()) {
                    fields.insert(header.to_string(), Value::String(value.to_string()));
                }
                Ok(Some(Record::new(fields, self.source_tag.clone())))
            }
            Ok(false) => Ok(None),
            Err(e) => Err(ContractError::source_read(format!(
                "CSV row read error: {e}"
            ))),
        }
    }

    fn close(&mut self) -> Result<(), ContractError> {
        self.reader = None;
        Ok(())
    }
}
