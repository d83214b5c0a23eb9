//! Fetch pipeline error types.
//!
//! One enum per stage, wrapped by [`FetchError`]. Payloads are plain strings
//! where the underlying error comes from an adapter crate (HTTP client), so
//! core stays free of those dependencies.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipeline stage a pair is in (or failed in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Invoking,
    Scanning,
    Downloading,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoking => f.write_str("invoking"),
            Self::Scanning => f.write_str("scanning"),
            Self::Downloading => f.write_str("downloading"),
        }
    }
}

/// Errors from running the image server child process.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Failed to spawn '{}': {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to communicate with child process: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The child exited unsuccessfully. `stderr` is the collected
    /// error-stream text, unmodified.
    #[error("Child process {}: {}", describe_exit(*code), stderr.trim())]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("Child process did not exit within {0:?}")]
    Timeout(Duration),
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "was terminated by a signal".to_string(),
        |code| format!("exited with status {code}"),
    )
}

/// Errors from decoding the child's output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("No result found in child process output")]
    NoResult,

    #[error("Server returned error: code={code}, message={message}")]
    Server { code: i64, message: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// Errors from downloading the image.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Download error for {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Download error for {url}: empty response body")]
    EmptyBody { url: String },

    #[error("I/O error writing '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl DownloadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code, if the server answered.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Any failure of a single pair.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl FetchError {
    pub const fn stage(&self) -> FetchStage {
        match self {
            Self::Invoke(_) => FetchStage::Invoking,
            Self::Scan(_) => FetchStage::Scanning,
            Self::Download(_) => FetchStage::Downloading,
        }
    }
}
