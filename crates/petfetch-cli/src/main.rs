//! CLI entry point - the composition root.
//!
//! This is the ONLY place where the CLI context is bootstrapped.
//! Command dispatch routes to handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use petfetch_cli::logging::filter_directive;
use petfetch_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: bool) {
    let directive = filter_directive(verbose, std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::new(cli.config);

    match command {
        Commands::Run(args) => {
            let ctx = bootstrap(config.with_overrides(args.overrides()))?;
            handlers::run::execute(&ctx).await?;
        }
        Commands::Fetch {
            kind,
            destination,
            server,
        } => {
            let overrides = petfetch_core::Settings {
                server_command: server,
                ..Default::default()
            };
            let ctx = bootstrap(config.with_overrides(overrides))?;
            handlers::fetch::execute(&ctx, &kind, destination).await?;
        }
        Commands::Tools { json } => {
            let ctx = bootstrap(config)?;
            handlers::tools::execute(&ctx, json)?;
        }
        Commands::Config => {
            let ctx = bootstrap(config)?;
            handlers::config::execute(&ctx)?;
        }
    }

    Ok(())
}
