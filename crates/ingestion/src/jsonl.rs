//! JSON Lines record source
//!
//! One JSON object per line; blank lines are skipped, a malformed line is
//! fatal to the run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use contracts::{ContractError, FieldMap, Record, RecordSource, SourceType};
use tracing::debug;

pub struct JsonlSource {
    reader: Option<BufReader<File>>,
    source_tag: String,
    line_no: usize,
}

impl JsonlSource {
    /// Open a JSONL file.
    ///
    /// # Errors
    /// File open failure.
    pub fn open(path: &Path) -> Result<Self, ContractError> {
        let file = File::open(path)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(file = %file_name, "opened JSONL source");

        Ok(Self {
            reader: Some(BufReader::new(file)),
            source_tag: format!("JSONL:{file_name}"),
            line_no: 0,
        })
    }
}

impl RecordSource for JsonlSource {
    fn source_type(&self) -> SourceType {
        SourceType::Jsonl
    }

    fn next_record(&mut self) -> Result<Option<Record>, ContractError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        loop {
            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| ContractError::source_read(format!("JSONL read error: {e}")))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields: FieldMap = serde_json::from_str(trimmed).map_err(|e| {
                ContractError::source_read(format!(
                    "JSONL parse error at line {}: {e}",
                    self.line_no
                ))
            })?;

            return Ok(Some(Record::new(fields, self.source_tag.clone())));
        }
    }

    fn close(&mut self) -> Result<(), ContractError> {
        self.reader = None;
        Ok(())
    }
}
