//! The per-pair pipeline: invoke, scan, download.

use std::path::Path;

use petfetch_core::{
    BatchEvent, BatchEventSink, FetchError, FetchRequest, FetchStage, ImageDownloader, ImageUrl,
    ProcessInvoker,
};
use tracing::debug;

use crate::bridge::scan_response;

/// A successfully fetched image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub url: ImageUrl,
    pub bytes: u64,
}

/// Borrowed ports for one pipeline run.
pub(crate) struct Stages<'a> {
    pub invoker: &'a dyn ProcessInvoker,
    pub downloader: &'a dyn ImageDownloader,
    pub sink: &'a dyn BatchEventSink,
}

impl Stages<'_> {
    fn enter(&self, index: usize, stage: FetchStage) {
        self.sink.emit(BatchEvent::StageChanged { index, stage });
    }

    /// Run the three stages in order. The first failure ends the pair; the
    /// downloader is never called without a scanned URL.
    pub(crate) async fn run(
        &self,
        index: usize,
        request: &FetchRequest,
        destination: &Path,
    ) -> Result<Fetched, FetchError> {
        self.enter(index, FetchStage::Invoking);
        let output = self.invoker.invoke(request).await?;

        self.enter(index, FetchStage::Scanning);
        let url = scan_response(&output.stdout)?;
        debug!(index, url = %url, "Image server returned URL");

        self.enter(index, FetchStage::Downloading);
        let bytes = self.downloader.download(&url, destination).await?;

        Ok(Fetched { url, bytes })
    }
}
