//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the batch driver expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process or HTTP client types in any signature
//! - One port per pipeline stage that touches the outside world
//! - Event emission is fire-and-forget and must not block

pub mod downloader;
pub mod event_sink;
pub mod invoker;

pub use downloader::ImageDownloader;
pub use event_sink::{BatchEventSink, NoopEventSink};
pub use invoker::{ProcessInvoker, ProcessOutput};
