//! storekeep - command line client for the store-admin backend.
//!
//! A thin wrapper over `storekeep-http`: every invocation restores the
//! session from the persisted cookie jar, runs one command, and writes the
//! jar back.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, ping, reports, settings, store};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.json_logs);

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &cli.global).await,
        Commands::Store(cmd) => store::handle(cmd, &cli.global).await,
        Commands::Settings(cmd) => settings::handle(cmd, &cli.global).await,
        Commands::Reports(cmd) => reports::handle(cmd, &cli.global).await,
        Commands::Ping(args) => ping::run(args, &cli.global).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
