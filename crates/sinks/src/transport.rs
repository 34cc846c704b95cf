//! Destination transports
//!
//! The wire-level seam below a sink: connect, send bytes, close. The four
//! built-in transports simulate their protocol with randomized latency and
//! an occasional failure, matching the latency and error profile of the
//! destination class they stand in for. Production deployments swap in real
//! clients behind the same trait.

use async_trait::async_trait;
use bytes::Bytes;
use contracts::{ContractError, Record, SinkDescriptor};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

/// Wire-level destination client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish the connection; called once at startup
    async fn connect(&self) -> Result<(), ContractError>;

    /// Deliver one encoded payload
    async fn send(&self, payload: &Bytes, record: &Record) -> Result<(), ContractError>;

    /// Release the connection; called once at shutdown
    async fn close(&self) -> Result<(), ContractError>;
}

/// Roll latency and failure outside the await so the rng never crosses it
fn roll(max_latency_ms: u64, failure_rate: f64) -> (Duration, bool) {
    let mut rng = rand::thread_rng();
    let latency = Duration::from_millis(rng.gen_range(0..=max_latency_ms));
    let fail = rng.gen_bool(failure_rate);
    (latency, fail)
}

async fn simulate(
    descriptor: &SinkDescriptor,
    max_latency_ms: u64,
    failure_rate: f64,
    error_label: &str,
) -> Result<(), ContractError> {
    let (latency, fail) = roll(max_latency_ms, failure_rate);
    tokio::time::sleep(latency).await;
    if fail {
        return Err(ContractError::sink_send(
            &descriptor.name,
            format!("simulated {error_label} error"),
        ));
    }
    Ok(())
}

/// HTTP POST client stand-in, ~50ms latency, 5% failures
pub struct RestTransport {
    descriptor: SinkDescriptor,
}

impl RestTransport {
    pub fn new(descriptor: SinkDescriptor) -> Self {
        Self { descriptor }
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn connect(&self) -> Result<(), ContractError> {
        info!(endpoint = %self.descriptor.endpoint, "REST transport connected");
        Ok(())
    }

    async fn send(&self, payload: &Bytes, _record: &Record) -> Result<(), ContractError> {
        debug!(
            endpoint = %self.descriptor.endpoint,
            bytes = payload.len(),
            "simulating POST"
        );
        simulate(&self.descriptor, 50, 0.05, "network").await
    }

    async fn close(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// gRPC channel stand-in, ~30ms latency, 3% failures
pub struct GrpcTransport {
    descriptor: SinkDescriptor,
}

impl GrpcTransport {
    pub fn new(descriptor: SinkDescriptor) -> Self {
        Self { descriptor }
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn connect(&self) -> Result<(), ContractError> {
        info!(endpoint = %self.descriptor.endpoint, "gRPC transport connected");
        Ok(())
    }

    async fn send(&self, payload: &Bytes, _record: &Record) -> Result<(), ContractError> {
        debug!(
            endpoint = %self.descriptor.endpoint,
            bytes = payload.len(),
            "simulating gRPC call"
        );
        simulate(&self.descriptor, 30, 0.03, "gRPC").await
    }

    async fn close(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Message broker producer stand-in, ~20ms latency, 2% failures
pub struct MessageQueueTransport {
    descriptor: SinkDescriptor,
}

impl MessageQueueTransport {
    pub fn new(descriptor: SinkDescriptor) -> Self {
        Self { descriptor }
    }
}

#[async_trait]
impl Transport for MessageQueueTransport {
    async fn connect(&self) -> Result<(), ContractError> {
        info!(
            endpoint = %self.descriptor.endpoint,
            topic = self.descriptor.topic.as_deref().unwrap_or("-"),
            "message queue transport connected"
        );
        Ok(())
    }

    async fn send(&self, payload: &Bytes, record: &Record) -> Result<(), ContractError> {
        debug!(
            topic = self.descriptor.topic.as_deref().unwrap_or("-"),
            key = %record.id,
            bytes = payload.len(),
            "simulating publish"
        );
        simulate(&self.descriptor, 20, 0.02, "MQ").await
    }

    async fn close(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Wide-column session stand-in, ~10ms latency, 1% failures
pub struct WideColumnTransport {
    descriptor: SinkDescriptor,
}

impl WideColumnTransport {
    pub fn new(descriptor: SinkDescriptor) -> Self {
        Self { descriptor }
    }
}

#[async_trait]
impl Transport for WideColumnTransport {
    async fn connect(&self) -> Result<(), ContractError> {
        info!(
            endpoint = %self.descriptor.endpoint,
            keyspace = self.descriptor.keyspace.as_deref().unwrap_or("-"),
            table = self.descriptor.table.as_deref().unwrap_or("-"),
            "wide-column transport connected"
        );
        Ok(())
    }

    async fn send(&self, payload: &Bytes, _record: &Record) -> Result<(), ContractError> {
        debug!(
            keyspace = self.descriptor.keyspace.as_deref().unwrap_or("-"),
            table = self.descriptor.table.as_deref().unwrap_or("-"),
            bytes = payload.len(),
            "simulating UPSERT"
        );
        simulate(&self.descriptor, 10, 0.01, "DB").await
    }

    async fn close(&self) -> Result<(), ContractError> {
        Ok(())
    }
}
