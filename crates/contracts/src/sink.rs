//! DataSink trait - Orchestrator output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, ProcessingResult, Record, SinkKind};
use async_trait::async_trait;

/// Delivery destination trait
///
/// All sink implementations must implement this trait. One instance serves
/// all records of a run; `process` must be safe for concurrent calls.
#[async_trait]
pub trait DataSink: Send + Sync {
    /// Sink name (unique; used for metrics and retry routing)
    fn name(&self) -> &str;

    /// Destination kind
    fn kind(&self) -> SinkKind;

    /// Process a single record: rate-limit, transform, send, classify.
    ///
    /// Never returns an error: delivery failures are resolved into the
    /// result's outcome (retryable vs permanent).
    async fn process(&self, record: Record) -> ProcessingResult;

    /// Lifecycle hook, called exactly once before any record is dispatched.
    ///
    /// # Errors
    /// A failure here is fatal to startup.
    async fn initialize(&self) -> Result<(), ContractError>;

    /// Lifecycle hook, called exactly once at engine shutdown.
    ///
    /// # Errors
    /// Failures are logged and swallowed by the caller.
    async fn shutdown(&self) -> Result<(), ContractError>;
}

impl std::fmt::Debug for dyn DataSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSink")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
