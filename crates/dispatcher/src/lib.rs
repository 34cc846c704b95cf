//! # Dispatcher
//!
//! The fan-out engine core.
//!
//! Responsibilities:
//! - Admission-controlled fan-out of records to every enabled sink
//! - Per-(record, sink) retry escalation bounded by the sink's budget
//! - Dead-letter persistence of permanently failed deliveries
//! - Lifecycle: startup, drain, graceful and forced shutdown

mod dead_letter;
mod orchestrator;

pub use dead_letter::DeadLetterQueue;
pub use orchestrator::{FanOutOrchestrator, OrchestratorConfig};
