//! Entry point: parse flags, load config, install tracing, and dispatch
//! to the `subscribe`/`publish`/`version` subcommand (spec §6).

mod cli;
mod commands;
mod config;
mod error;
mod signals;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::EventHandlerConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Commands::Version = cli.command {
        println!("eventhandler {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(err) = run(&cli).await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> error::CliResult<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("eventhandler.yaml"));
    let config = EventHandlerConfig::load(&config_path)?;

    match cli.command {
        Commands::Subscribe => commands::subscribe::run(cli, &config).await,
        Commands::Publish => commands::publish::run(cli, &config).await,
        Commands::Version => unreachable!("handled in main"),
    }
}
