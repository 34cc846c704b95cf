//! SinkRuntime, the shared sink skeleton
//!
//! Owns the per-sink throttle, the encoder, and the transport. Every sink
//! kind is this one type with a different transport behind it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use contracts::{
    ContractError, DataSink, ProcessingResult, Record, SinkDescriptor, SinkKind, Transformer,
};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::rate_limit::RateLimiter;
use crate::transport::Transport;

pub struct SinkRuntime {
    descriptor: SinkDescriptor,
    transformer: Arc<dyn Transformer>,
    limiter: RateLimiter,
    transport: Box<dyn Transport>,
}

impl SinkRuntime {
    pub fn new(
        descriptor: SinkDescriptor,
        transformer: Arc<dyn Transformer>,
        transport: Box<dyn Transport>,
    ) -> Self {
        let limiter = RateLimiter::per_second(descriptor.rate_limit);
        Self {
            descriptor,
            transformer,
            limiter,
            transport,
        }
    }

    /// Encode and send, bounding the send by the configured timeout
    async fn deliver(&self, record: &Record) -> Result<(), ContractError> {
        let payload = self.transformer.transform(record)?;
        let budget = Duration::from_millis(self.descriptor.timeout_ms);
        match tokio::time::timeout(budget, self.transport.send(&payload, record)).await {
            Ok(result) => result,
            Err(_) => Err(ContractError::SinkTimeout {
                sink_name: self.descriptor.name.clone(),
                timeout_ms: self.descriptor.timeout_ms,
            }),
        }
    }
}

#[async_trait]
impl DataSink for SinkRuntime {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn kind(&self) -> SinkKind {
        self.descriptor.kind
    }

    async fn process(&self, record: Record) -> ProcessingResult {
        // The throttle wait counts toward the reported duration
        let start = Instant::now();
        self.limiter.acquire().await;

        let outcome = self.deliver(&record).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                debug!(
                    sink = %self.descriptor.name,
                    record_id = %record.id,
                    duration_ms,
                    "record processed"
                );
                ProcessingResult::success(record, &self.descriptor.name, duration_ms)
            }
            Err(e) => {
                error!(
                    sink = %self.descriptor.name,
                    record_id = %record.id,
                    error = %e,
                    "failed to process record"
                );
                if record.retry_count < self.descriptor.retry_attempts {
                    ProcessingResult::retryable(record, &self.descriptor.name, e.to_string(), duration_ms)
                } else {
                    ProcessingResult::permanent_failure(
                        record,
                        &self.descriptor.name,
                        e.to_string(),
                        duration_ms,
                    )
                }
            }
        }
    }

    async fn initialize(&self) -> Result<(), ContractError> {
        info!(sink = %self.descriptor.name, kind = %self.descriptor.kind, "initializing sink");
        self.transport.connect().await
    }

    async fn shutdown(&self) -> Result<(), ContractError> {
        info!(sink = %self.descriptor.name, "shutting down sink");
        self.transport.close().await
    }
}
