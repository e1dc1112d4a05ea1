//! sdkup - SDK bundle updater
//!
//! Fetches the manifests describing the available SDK bundles, compares them
//! with the locally installed bundles and installs, updates, reinstalls or
//! removes bundles on request.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod fetch;
mod installer;
mod manifest;
mod paths;
mod progress;
mod reconcile;
#[cfg(test)]
mod test_fixtures;
mod transaction;
mod workspace;

use cli::{Cli, Commands};
use commands::CommandContext;
use error::Result;
use fetch::HttpFetcher;

/// Log filter for a `-v` count, used when `RUST_LOG` is not set
fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose))),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = CommandContext::from_cli(&cli)?;

    if cli.update_sdk_tools {
        let fetcher = HttpFetcher::new()?;
        return commands::self_update::run(&ctx, &fetcher);
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Info(args) => commands::info::run(&ctx, &HttpFetcher::new()?, args),
        Commands::List(args) => commands::list::run(&ctx, &HttpFetcher::new()?, args),
        Commands::Update(args) | Commands::Install(args) => {
            commands::update::run(&ctx, &HttpFetcher::new()?, args)
        }
        Commands::Uninstall(args) => commands::uninstall::run(&ctx, args),
        Commands::Reinstall(args) => commands::reinstall::run(&ctx, &HttpFetcher::new()?, args),
        Commands::Sources(args) => commands::sources::run(&ctx, args),
        Commands::Version => commands::version::run(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
