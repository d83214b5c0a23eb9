//! Subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use petfetch_core::Settings;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every configured pair
    Run(RunArgs),

    /// Fetch a single image
    Fetch {
        /// Kind of pet (cat, dog, ...)
        kind: String,
        /// Where to write the image
        destination: PathBuf,
        /// Image server executable
        #[arg(long, value_name = "PATH")]
        server: Option<PathBuf>,
    },

    /// Describe the image server's tools
    Tools {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective settings as JSON
    Config,
}

/// Flags for `run`, each overriding the matching setting.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Image server executable
    #[arg(long, value_name = "PATH")]
    pub server: Option<PathBuf>,

    /// Pairs fetched at once (1-16)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Base directory for relative destinations
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Create missing destination directories
    #[arg(long)]
    pub create_dirs: bool,
}

impl RunArgs {
    pub fn overrides(&self) -> Settings {
        Settings {
            server_command: self.server.clone(),
            concurrency: self.concurrency,
            output_dir: self.output_dir.clone(),
            create_dirs: self.create_dirs.then_some(true),
            ..Settings::default()
        }
    }
}
