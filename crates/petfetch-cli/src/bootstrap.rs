//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings (defaults, file, environment, command-line overrides)
//! - Child process invoker (via petfetch-download)
//! - HTTP downloader (via petfetch-download)
//! - Batch driver with a console event sink
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use petfetch_core::{RequestFactory, Settings, load_settings_with_env, validate_settings};
use petfetch_download::{
    BatchDriver, ChildProcessInvoker, DownloaderConfig, HttpDownloader, console_sink,
};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit settings file (`--config`).
    pub config_path: Option<PathBuf>,
    /// Command-line overrides, applied last.
    pub overrides: Settings,
}

impl CliConfig {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            overrides: Settings::default(),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Settings) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// Effective, validated settings.
    pub settings: Settings,
    /// Batch driver wired to the real image server and HTTP client.
    pub driver: BatchDriver,
}

/// Compose the CLI context from the process environment.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    bootstrap_with_env(config, |key| std::env::var(key).ok())
}

/// Compose the CLI context with an injectable environment lookup.
pub fn bootstrap_with_env<F>(config: CliConfig, env: F) -> Result<CliContext, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = resolve_settings(config, env)?;
    let driver = build_driver(&settings)?;
    Ok(CliContext { settings, driver })
}

/// Load, override and validate settings.
pub fn resolve_settings<F>(config: CliConfig, env: F) -> Result<Settings, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = load_settings_with_env(config.config_path.as_deref(), env)?;
    settings.merge(config.overrides);
    validate_settings(&settings)?;
    debug!(?settings, "Resolved settings");
    Ok(settings)
}

/// Build the batch driver described by `settings`.
pub fn build_driver(settings: &Settings) -> Result<BatchDriver, CliError> {
    let invoker = ChildProcessInvoker::new(settings.effective_server_command())
        .with_working_dir(settings.working_dir.clone())
        .with_env(settings.effective_env())
        .with_timeout(settings.process_timeout());

    let downloader = HttpDownloader::new(&DownloaderConfig {
        create_dirs: settings.effective_create_dirs(),
        request_timeout: settings.request_timeout(),
    })?;

    let requests = RequestFactory::new(settings.effective_method())
        .with_protocol_version(settings.effective_protocol_version());

    Ok(
        BatchDriver::new(requests, Arc::new(invoker), Arc::new(downloader))
            .with_sink(console_sink())
            .with_concurrency(settings.effective_concurrency()),
    )
}
