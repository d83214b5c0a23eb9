//! Image downloader port.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::ImageUrl;
use crate::errors::DownloadError;

/// Streams a remote image into a local file.
///
/// On success the destination holds the complete body and the number of
/// bytes written is returned. On failure nothing is left at the destination.
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    async fn download(&self, url: &ImageUrl, destination: &Path) -> Result<u64, DownloadError>;
}
