//! Sink construction from configuration

use std::sync::Arc;

use contracts::{ContractError, DataSink, EngineConfig, SinkDescriptor, SinkKind};
use transform::TransformerRegistry;

use crate::runtime::SinkRuntime;
use crate::transport::{
    GrpcTransport, MessageQueueTransport, RestTransport, Transport, WideColumnTransport,
};

/// Build one sink from its descriptor.
///
/// # Errors
/// Unknown transformation format.
pub fn create_sink(
    descriptor: &SinkDescriptor,
    registry: &TransformerRegistry,
) -> Result<Arc<dyn DataSink>, ContractError> {
    let transformer = registry.get(&descriptor.transformation)?;
    let transport: Box<dyn Transport> = match descriptor.kind {
        SinkKind::Rest => Box::new(RestTransport::new(descriptor.clone())),
        SinkKind::Grpc => Box::new(GrpcTransport::new(descriptor.clone())),
        SinkKind::MessageQueue => Box::new(MessageQueueTransport::new(descriptor.clone())),
        SinkKind::WideColumn => Box::new(WideColumnTransport::new(descriptor.clone())),
    };
    Ok(Arc::new(SinkRuntime::new(
        descriptor.clone(),
        transformer,
        transport,
    )))
}

/// Build every enabled sink in configuration order.
///
/// # Errors
/// Any sink with an unknown transformation format fails the whole build.
pub fn build_sinks(
    config: &EngineConfig,
    registry: &TransformerRegistry,
) -> Result<Vec<Arc<dyn DataSink>>, ContractError> {
    config
        .enabled_sinks()
        .map(|descriptor| create_sink(descriptor, registry))
        .collect()
}
