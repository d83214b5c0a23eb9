//! Layered settings loading.
//!
//! Precedence, lowest to highest:
//! 1. [`Settings::with_defaults`]
//! 2. JSON config file (`--config <path>`, `PETFETCH_CONFIG`, or
//!    `petfetch.json` in the working directory if present)
//! 3. `PETFETCH_*` environment variables
//!
//! Command-line flags are merged on top by the CLI adapter.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;

/// Config file picked up from the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "petfetch.json";

pub const ENV_CONFIG: &str = "PETFETCH_CONFIG";
pub const ENV_SERVER: &str = "PETFETCH_SERVER";
pub const ENV_OUTPUT_DIR: &str = "PETFETCH_OUTPUT_DIR";
pub const ENV_CONCURRENCY: &str = "PETFETCH_CONCURRENCY";
pub const ENV_METHOD: &str = "PETFETCH_METHOD";

/// Errors while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Load settings from the process environment.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_settings_with_env(explicit_path, |key| std::env::var(key).ok())
}

/// Load settings with an injectable environment lookup.
pub fn load_settings_with_env<F>(
    explicit_path: Option<&Path>,
    env: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::with_defaults();

    let config_path = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| env(ENV_CONFIG).map(PathBuf::from));

    match config_path {
        Some(path) => settings.merge(read_settings_file(&path)?),
        None => {
            let default_path = Path::new(CONFIG_FILE_NAME);
            if default_path.is_file() {
                settings.merge(read_settings_file(default_path)?);
            }
        }
    }

    settings.merge(settings_from_env(&env)?);
    Ok(settings)
}

/// Read a JSON settings file. Missing fields stay `None`.
pub fn read_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn settings_from_env<F>(env: &F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let concurrency = match non_empty(ENV_CONCURRENCY) {
        Some(raw) => Some(raw.trim().parse::<usize>().map_err(|e| {
            ConfigError::InvalidEnv {
                key: ENV_CONCURRENCY,
                value: raw.clone(),
                reason: e.to_string(),
            }
        })?),
        None => None,
    };

    Ok(Settings {
        server_command: non_empty(ENV_SERVER).map(PathBuf::from),
        output_dir: non_empty(ENV_OUTPUT_DIR).map(PathBuf::from),
        method: non_empty(ENV_METHOD),
        concurrency,
        ..Settings::default()
    })
}
