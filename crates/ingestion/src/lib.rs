//! # Ingestion
//!
//! File-backed record sources.
//!
//! Responsibilities:
//! - Stream records lazily from CSV and JSONL files
//! - Tag every record with its origin
//! - Reject source formats the engine does not support

mod csv;
mod jsonl;

pub use crate::csv::CsvSource;
pub use crate::jsonl::JsonlSource;

use std::path::Path;

use contracts::{ContractError, RecordSource, SourceConfig, SourceType};

/// Build the record source described by the configuration.
///
/// # Errors
/// - `FIXED_WIDTH` is recognized but unsupported
/// - File open failure
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn RecordSource>, ContractError> {
    let path = Path::new(&config.file_path);
    match config.source_type {
        SourceType::Csv => Ok(Box::new(CsvSource::open(path)?)),
        SourceType::Jsonl => Ok(Box::new(JsonlSource::open(path)?)),
        SourceType::FixedWidth => Err(ContractError::UnsupportedSource {
            source_type: SourceType::FixedWidth.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fixed_width_is_unsupported() {
        let config = SourceConfig {
            source_type: SourceType::FixedWidth,
            file_path: "data/records.dat".into(),
            batch_size: 100,
        };
        let err = create_source(&config).unwrap_err();
        assert!(matches!(err, ContractError::UnsupportedSource { .. }));
        assert!(err.to_string().contains("FIXED_WIDTH"));
    }

    #[test]
    fn test_factory_builds_csv_source() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name\nAlice\n").unwrap();

        let config = SourceConfig {
            source_type: SourceType::Csv,
            file_path: file.path().to_string_lossy().into_owned(),
            batch_size: 100,
        };
        let mut source = create_source(&config).unwrap();
        assert_eq!(source.source_type(), SourceType::Csv);
        assert!(source.next_record().unwrap().is_some());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let config = SourceConfig {
            source_type: SourceType::Jsonl,
            file_path: "/nonexistent/events.jsonl".into(),
            batch_size: 100,
        };
        assert!(create_source(&config).is_err());
    }
}
