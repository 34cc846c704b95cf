//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Identity Model
//! - A `Record` is identified by its `id` alone; a retry is a derived copy
//!   with the same `id` and an incremented `retry_count`
//! - A `SinkDescriptor.name` is the sole routing key for retry resolution

mod config;
mod error;
mod model;
mod sink;
mod source;
mod transform;

pub use config::*;
pub use error::*;
pub use model::*;
pub use sink::DataSink;
pub use source::RecordSource;
pub use transform::Transformer;
