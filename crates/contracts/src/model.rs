//! Record and ProcessingResult - the value types flowing through the pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// Field mapping carried by a record, in source order
pub type FieldMap = serde_json::Map<String, Value>;

/// A single data record flowing through the system.
///
/// Identity is the `id`: two records are equal iff their ids match. A retry
/// never mutates a dispatched record; it produces a derived copy via
/// [`Record::with_incremented_retry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Opaque unique identifier
    pub id: String,
    /// Field name -> value mapping, in source order
    pub fields: FieldMap,
    /// Ingestion timestamp
    pub created_at: DateTime<Utc>,
    /// Source tag (e.g. "CSV:users.csv")
    pub source_tag: String,
    /// Number of retries already applied to this record
    pub retry_count: u32,
}

impl Record {
    /// Create a fresh record at ingestion time
    pub fn new(fields: FieldMap, source_tag: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            fields,
            created_at: Utc::now(),
            source_tag: source_tag.into(),
            retry_count: 0,
        }
    }

    /// Derived copy with `retry_count + 1`; same id, same payload
    pub fn with_incremented_retry(&self) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            ..self.clone()
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Terminal-or-retryable outcome of one (record, sink, attempt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    RetryableFailure,
    PermanentFailure,
}

/// Result of processing a record through a sink.
///
/// Produced exactly once per (record, sink, attempt) tuple, only via the
/// three named constructors.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub record: Record,
    pub sink_name: String,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ProcessingResult {
    pub fn success(record: Record, sink_name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            record,
            sink_name: sink_name.into(),
            outcome: Outcome::Success,
            error: None,
            processed_at: Utc::now(),
            duration_ms,
        }
    }

    pub fn retryable(
        record: Record,
        sink_name: impl Into<String>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            record,
            sink_name: sink_name.into(),
            outcome: Outcome::RetryableFailure,
            error: Some(error.into()),
            processed_at: Utc::now(),
            duration_ms,
        }
    }

    pub fn permanent_failure(
        record: Record,
        sink_name: impl Into<String>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            record,
            sink_name: sink_name.into(),
            outcome: Outcome::PermanentFailure,
            error: Some(error.into()),
            processed_at: Utc::now(),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn is_permanent_failure(&self) -> bool {
        self.outcome == Outcome::PermanentFailure
    }

    pub fn should_retry(&self) -> bool {
        self.outcome == Outcome::RetryableFailure
    }
}
