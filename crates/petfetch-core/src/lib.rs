//! Core domain types and port definitions for petfetch.
//!
//! This crate holds everything the fetch pipeline agrees on without
//! committing to an implementation:
//!
//! - [`domain`] - pet kinds, batch pairs, the request message, image URLs
//! - [`errors`] - the fetch error taxonomy, one enum per pipeline stage
//! - [`events`] - batch progress events
//! - [`ports`] - traits for the child process invoker, downloader and event sink
//! - [`settings`] / [`config`] - configuration types and layered loading
//! - [`catalog`] - static description of the pet server's MCP tools
#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use catalog::{PET_SERVER, ServerSpec, ToolParam, ToolSpec};
pub use config::{CONFIG_FILE_NAME, ConfigError, load_settings, load_settings_with_env};
pub use domain::{
    BatchPair, BatchReport, FetchParams, FetchRequest, ImageUrl, JSONRPC_VERSION, PairOutcome,
    PairReport, PetKind, RequestFactory, Transport,
};
pub use errors::{DownloadError, FetchError, FetchStage, InvokeError, ScanError};
pub use events::BatchEvent;
pub use ports::{
    BatchEventSink, ImageDownloader, NoopEventSink, ProcessInvoker, ProcessOutput,
};
pub use settings::{
    DEFAULT_CONCURRENCY, DEFAULT_METHOD, DEFAULT_SERVER_COMMAND, MAX_CONCURRENCY, Settings,
    SettingsError, validate_settings,
};
