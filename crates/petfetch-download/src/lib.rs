//! Fetch pipeline adapters for petfetch.
//!
//! - [`bridge`] - run the image server once per request and decode its output
//! - [`http`] - stream the image into its destination file
//! - [`batch`] - drive pairs through the pipeline and collect a report
//! - [`progress`] - console presentation of batch events
#![deny(unused_crate_dependencies)]

pub mod batch;
pub mod bridge;
pub mod http;
pub mod progress;

pub use batch::{BatchDriver, Fetched, TracingEventSink};
pub use bridge::{ChildProcessInvoker, scan_response};
pub use http::{DownloaderConfig, HttpDownloader};
pub use progress::{BatchProgress, console_sink};
