use petfetch_core::{BatchEvent, BatchEventSink};
use tracing::{debug, info};

/// Writes batch events as log lines. Used when stdout is not a terminal.
///
/// Failures are already logged at warn level by the driver, so they only
/// show up here at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl BatchEventSink for TracingEventSink {
    fn emit(&self, event: BatchEvent) {
        match event {
            BatchEvent::Started { total } => info!(total, "Fetching pet images"),
            BatchEvent::PairStarted {
                index,
                kind,
                destination,
            } => debug!(index, %kind, destination = %destination.display(), "Pair started"),
            BatchEvent::StageChanged { index, stage } => debug!(index, %stage, "Stage changed"),
            BatchEvent::PairCompleted {
                kind,
                destination,
                url,
                bytes,
                ..
            } => info!(%kind, %url, bytes, "Saved {}", destination.display()),
            BatchEvent::PairFailed {
                kind,
                destination,
                stage,
                error,
                ..
            } => debug!(%kind, %stage, "Failed to fetch {}: {error}", destination.display()),
            BatchEvent::Finished { succeeded, failed } => {
                info!(succeeded, failed, "Done");
            }
        }
    }
}
