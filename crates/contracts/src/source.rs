//! RecordSource trait - ingestion input interface

use crate::{ContractError, Record, SourceType};

/// A lazy, finite sequence of records.
///
/// Implementations stream from their backing file and must never load the
/// whole input into memory.
pub trait RecordSource: Send {
    /// Source format
    fn source_type(&self) -> SourceType;

    /// Next record, or `None` once the source is exhausted.
    ///
    /// # Errors
    /// A read or parse failure is fatal to the run.
    fn next_record(&mut self) -> Result<Option<Record>, ContractError>;

    /// Release the underlying reader
    fn close(&mut self) -> Result<(), ContractError>;
}

impl std::fmt::Debug for dyn RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSource")
            .field("source_type", &self.source_type())
            .finish()
    }
}
