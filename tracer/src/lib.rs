//! Trace synthesis for parsed Atlas records.
//!
//! Request/response records that carry a `duration` in their header are
//! turned into OpenTelemetry spans and exported through one tracer per
//! `hostname:component` pair.

pub mod config;
mod error;
pub mod pipeline;
pub mod registry;
pub mod span;
pub mod writer;

pub use config::{ExporterKind, TracerSettings};
pub use error::{Error, SpanError};
pub use pipeline::Totals;
pub use registry::{TracerHandle, TracerIdentity, TracerRegistry};
pub use span::{synthesize, SpanSpec, TagValue};
pub use writer::{CloseStatus, TraceWriter, WriteOutcome};
