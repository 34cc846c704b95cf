//! # Sinks
//!
//! Delivery destinations.
//!
//! Responsibilities:
//! - One shared runtime (throttle, encoder, timeout, retry classification)
//!   with a pluggable wire-level transport per destination kind
//! - Built-in simulated transports for REST, gRPC, MQ and wide-column DB
//! - Construction of every enabled sink from configuration

mod factory;
mod rate_limit;
mod runtime;
mod transport;

pub use factory::{build_sinks, create_sink};
pub use rate_limit::RateLimiter;
pub use runtime::SinkRuntime;
pub use transport::{
    GrpcTransport, MessageQueueTransport, RestTransport, Transport, WideColumnTransport,
};
