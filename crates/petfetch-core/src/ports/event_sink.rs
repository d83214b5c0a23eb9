//! Batch event sink port.

use crate::events::BatchEvent;

/// Receives batch progress events.
///
/// Implementations should not block; the driver calls `emit` inline
/// between pipeline stages.
pub trait BatchEventSink: Send + Sync {
    fn emit(&self, event: BatchEvent);
}

/// A sink that discards all events, for tests and library callers that only
/// want the final report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl NoopEventSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BatchEventSink for NoopEventSink {
    fn emit(&self, _event: BatchEvent) {}
}
