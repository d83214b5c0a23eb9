//! HTTP image downloader.
//!
//! Streams a response body into `<destination>.part` and renames it onto
//! the destination once the body is complete. Any failure removes the
//! partial file, so a destination is either fully written or absent.

use std::error::Error as StdError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use petfetch_core::{DownloadError, ImageDownloader, ImageUrl, Transport};
use reqwest::{Client, redirect};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("petfetch/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;
const PART_SUFFIX: &str = ".part";

/// Downloader options.
#[derive(Debug, Clone, Default)]
pub struct DownloaderConfig {
    /// Create missing parent directories of the destination.
    pub create_dirs: bool,
    /// Overall per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

/// Downloads images over one of two transports picked by URL scheme.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    secure: Client,
    plain: Client,
    create_dirs: bool,
}

impl HttpDownloader {
    pub fn new(config: &DownloaderConfig) -> Result<Self, DownloadError> {
        Ok(Self {
            secure: build_client(Transport::Secure, config.request_timeout)?,
            plain: build_client(Transport::Plain, config.request_timeout)?,
            create_dirs: config.create_dirs,
        })
    }

    /// Transport a URL will be fetched with.
    pub fn transport_for(url: &ImageUrl) -> Transport {
        Transport::for_url(url.as_str())
    }

    const fn client(&self, transport: Transport) -> &Client {
        match transport {
            Transport::Secure => &self.secure,
            Transport::Plain => &self.plain,
        }
    }

    /// Download `url` into `destination`, returning the number of bytes written.
    pub async fn fetch_to_file(
        &self,
        url: &ImageUrl,
        destination: &Path,
    ) -> Result<u64, DownloadError> {
        if self.create_dirs {
            if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DownloadError::io(parent, e))?;
            }
        }

        let part = part_path(destination);
        let mut file = File::create(&part)
            .await
            .map_err(|e| DownloadError::io(&part, e))?;

        let transport = Self::transport_for(url);
        debug!(url = %url, %transport, destination = %destination.display(), "Starting download");

        let streamed = self.stream_body(transport, url, &part, &mut file).await;
        let finished = match streamed {
            Ok(bytes) => finish_file(file, &part, destination).await.map(|()| bytes),
            Err(e) => {
                drop(file);
                Err(e)
            }
        };

        if finished.is_err() {
            discard_partial(&part).await;
        }
        finished
    }

    async fn stream_body(
        &self,
        transport: Transport,
        url: &ImageUrl,
        part: &Path,
        file: &mut File,
    ) -> Result<u64, DownloadError> {
        let response = self
            .client(transport)
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| network_error(url, &e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(part, e))?;
            written += chunk.len() as u64;
        }

        if written == 0 {
            return Err(DownloadError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(written)
    }
}

#[async_trait]
impl ImageDownloader for HttpDownloader {
    async fn download(&self, url: &ImageUrl, destination: &Path) -> Result<u64, DownloadError> {
        self.fetch_to_file(url, destination).await
    }
}

fn build_client(transport: Transport, timeout: Option<Duration>) -> Result<Client, DownloadError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    builder = match transport {
        Transport::Secure => builder.https_only(true).redirect(redirect::Policy::custom(
            |attempt| {
                if attempt.url().scheme() != "https" {
                    attempt.error("refusing redirect to a non-https URL")
                } else if attempt.previous().len() >= MAX_REDIRECTS {
                    attempt.stop()
                } else {
                    attempt.follow()
                }
            },
        )),
        Transport::Plain => builder.redirect(redirect::Policy::limited(MAX_REDIRECTS)),
    };

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| DownloadError::Client(e.to_string()))
}

async fn finish_file(mut file: File, part: &Path, destination: &Path) -> Result<(), DownloadError> {
    file.flush().await.map_err(|e| DownloadError::io(part, e))?;
    file.sync_all().await.map_err(|e| DownloadError::io(part, e))?;
    drop(file);
    fs::rename(part, destination)
        .await
        .map_err(|e| DownloadError::io(destination, e))
}

/// Best-effort removal of a partial download.
async fn discard_partial(part: &Path) {
    if let Err(e) = fs::remove_file(part).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %part.display(), error = %e, "Failed to remove partial download");
        }
    }
}

/// `<destination>.part`, next to the destination so the final rename stays on one filesystem.
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(PART_SUFFIX);
    destination.with_file_name(name)
}

/// Flatten an error and its sources into one message.
fn network_error(url: &ImageUrl, err: &reqwest::Error) -> DownloadError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    DownloadError::Network {
        url: url.to_string(),
        message,
    }
}
