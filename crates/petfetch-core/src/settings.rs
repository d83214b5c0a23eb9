//! Settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies.
//! Loading from files and the environment lives in [`crate::config`].

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{BatchPair, PetKind};

/// Default path of the image server executable.
pub const DEFAULT_SERVER_COMMAND: &str = "./pet-server";

/// Default method name written into requests.
pub const DEFAULT_METHOD: &str = "get_pet_image";

/// Default number of pairs processed at once (strictly sequential).
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Upper bound for the worker pool.
pub const MAX_CONCURRENCY: usize = 16;

/// Application settings structure.
///
/// All fields are optional to support layering (defaults, file, environment,
/// command line) and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Image server executable, started with no arguments.
    pub server_command: Option<PathBuf>,

    /// Working directory for the image server.
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables for the image server.
    pub env: Option<BTreeMap<String, String>>,

    /// Method name written into requests.
    pub method: Option<String>,

    /// Protocol marker written into requests.
    pub protocol_version: Option<String>,

    /// Base directory for relative destinations.
    pub output_dir: Option<PathBuf>,

    /// Create missing destination directories before downloading.
    pub create_dirs: Option<bool>,

    /// Number of pairs processed at once (1-16).
    pub concurrency: Option<usize>,

    /// Kill the image server if it runs longer than this.
    pub process_timeout_secs: Option<u64>,

    /// Abort a download if it takes longer than this.
    pub request_timeout_secs: Option<u64>,

    /// The batch to run.
    pub pairs: Option<Vec<BatchPair>>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            server_command: Some(PathBuf::from(DEFAULT_SERVER_COMMAND)),
            working_dir: None,
            env: None,
            method: Some(DEFAULT_METHOD.to_string()),
            protocol_version: Some(crate::domain::JSONRPC_VERSION.to_string()),
            output_dir: Some(PathBuf::from(".")),
            create_dirs: Some(false),
            concurrency: Some(DEFAULT_CONCURRENCY),
            process_timeout_secs: None,
            request_timeout_secs: None,
            pairs: Some(default_pairs()),
        }
    }

    pub fn effective_server_command(&self) -> PathBuf {
        self.server_command
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVER_COMMAND))
    }

    pub fn effective_method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }

    pub fn effective_protocol_version(&self) -> &str {
        self.protocol_version
            .as_deref()
            .unwrap_or(crate::domain::JSONRPC_VERSION)
    }

    pub fn effective_output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    pub fn effective_create_dirs(&self) -> bool {
        self.create_dirs.unwrap_or(false)
    }

    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    pub fn process_timeout(&self) -> Option<Duration> {
        self.process_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn effective_env(&self) -> Vec<(String, String)> {
        self.env
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The configured batch with destinations resolved against `output_dir`.
    pub fn resolved_pairs(&self) -> Vec<BatchPair> {
        let base = self.effective_output_dir();
        self.pairs
            .as_ref()
            .map_or_else(default_pairs, Clone::clone)
            .iter()
            .map(|pair| pair.resolved_against(base))
            .collect()
    }

    /// Overlay every field that is `Some` in `other` onto `self`.
    pub fn merge(&mut self, other: Self) {
        let Self {
            server_command,
            working_dir,
            env,
            method,
            protocol_version,
            output_dir,
            create_dirs,
            concurrency,
            process_timeout_secs,
            request_timeout_secs,
            pairs,
        } = other;

        if server_command.is_some() {
            self.server_command = server_command;
        }
        if working_dir.is_some() {
            self.working_dir = working_dir;
        }
        if env.is_some() {
            self.env = env;
        }
        if method.is_some() {
            self.method = method;
        }
        if protocol_version.is_some() {
            self.protocol_version = protocol_version;
        }
        if output_dir.is_some() {
            self.output_dir = output_dir;
        }
        if create_dirs.is_some() {
            self.create_dirs = create_dirs;
        }
        if concurrency.is_some() {
            self.concurrency = concurrency;
        }
        if process_timeout_secs.is_some() {
            self.process_timeout_secs = process_timeout_secs;
        }
        if request_timeout_secs.is_some() {
            self.request_timeout_secs = request_timeout_secs;
        }
        if pairs.is_some() {
            self.pairs = pairs;
        }
    }
}

/// The built-in batch: one cat, one dog.
pub fn default_pairs() -> Vec<BatchPair> {
    vec![
        BatchPair::new(PetKind::Cat, "cat.jpg"),
        BatchPair::new(PetKind::Dog, "dog.jpg"),
    ]
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Server command must not be empty")]
    EmptyServerCommand,

    #[error("Method name must not be empty")]
    EmptyMethod,

    #[error("Concurrency must be between 1 and 16, got {0}")]
    InvalidConcurrency(usize),

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Destination '{}' is used by more than one pair", .0.display())]
    DuplicateDestination(PathBuf),

    #[error("Pair for kind '{0}' has no destination file name")]
    EmptyDestination(String),
}

/// Validate settings before a run.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings
        .server_command
        .as_ref()
        .is_some_and(|cmd| cmd.as_os_str().is_empty())
    {
        return Err(SettingsError::EmptyServerCommand);
    }

    if settings
        .method
        .as_ref()
        .is_some_and(|m| m.trim().is_empty())
    {
        return Err(SettingsError::EmptyMethod);
    }

    if let Some(concurrency) = settings.concurrency {
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(SettingsError::InvalidConcurrency(concurrency));
        }
    }

    if settings.process_timeout_secs == Some(0) {
        return Err(SettingsError::ZeroTimeout("Process"));
    }
    if settings.request_timeout_secs == Some(0) {
        return Err(SettingsError::ZeroTimeout("Request"));
    }

    let mut seen = HashSet::new();
    for pair in settings.resolved_pairs() {
        if pair.destination.file_name().is_none() {
            return Err(SettingsError::EmptyDestination(pair.kind.to_string()));
        }
        if !seen.insert(pair.destination.clone()) {
            return Err(SettingsError::DuplicateDestination(pair.destination));
        }
    }

    Ok(())
}
