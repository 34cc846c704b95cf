//! Transformer trait - per-format byte encoding strategy

use crate::{ContractError, Record};
use bytes::Bytes;

/// Pure, stateless record-to-bytes encoding.
///
/// One instance per format, shared by every sink configured with that
/// format; selected once at sink construction by format name.
pub trait Transformer: Send + Sync {
    /// Format name used as the registry key (e.g. "JSON")
    fn format(&self) -> &str;

    /// Encode a record to its wire representation
    ///
    /// # Errors
    /// Encoding failures are classified by the sink like any send failure.
    fn transform(&self, record: &Record) -> Result<Bytes, ContractError>;
}

impl std::fmt::Debug for dyn Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("format", &self.format())
            .finish()
    }
}
