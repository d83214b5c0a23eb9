//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the pet image fetcher.
#[derive(Parser)]
#[command(name = "petfetch")]
#[command(about = "Fetch pet images through a local image server")]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON). Defaults to ./petfetch.json when present
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["petfetch", "tools", "--verbose", "--config", "/tmp/p.json"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.json")));
        assert!(matches!(cli.command, Some(Commands::Tools { json: false })));
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::parse_from([
            "petfetch",
            "run",
            "--server",
            "/opt/pet-server",
            "--concurrency",
            "4",
            "--output-dir",
            "pics",
            "--create-dirs",
        ]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.server_command, Some(PathBuf::from("/opt/pet-server")));
        assert_eq!(overrides.concurrency, Some(4));
        assert_eq!(overrides.output_dir, Some(PathBuf::from("pics")));
        assert_eq!(overrides.create_dirs, Some(true));
    }

    #[test]
    fn test_fetch_takes_kind_and_destination() {
        let cli = Cli::parse_from(["petfetch", "fetch", "Dogs", "out/dog.jpg"]);
        let Some(Commands::Fetch { kind, destination, server }) = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(kind, "Dogs");
        assert_eq!(destination, PathBuf::from("out/dog.jpg"));
        assert!(server.is_none());
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = Cli::parse_from(["petfetch"]);
        assert!(cli.command.is_none());
    }
}
