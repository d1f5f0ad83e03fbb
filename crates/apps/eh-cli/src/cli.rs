//! CLI argument definitions (spec §6 "CLI").

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Broker-attached event handler.
#[derive(Parser, Debug)]
#[command(name = "eventhandler")]
#[command(author = "Event Handler Contributors")]
#[command(version)]
#[command(about = "Subscribe, filter, and dispatch bus envelopes to a local command")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long = "log.level", global = true, default_value = "info")]
    pub log_level: String,

    /// Override the configured NATS connection URL.
    #[arg(long, global = true)]
    pub nats_url: Option<String>,

    /// Override the configured subject.
    #[arg(long, global = true)]
    pub subject: Option<String>,

    /// Sender identity (publish only).
    #[arg(long, global = true)]
    pub sender: Option<String>,

    /// Recipient identity (publish only).
    #[arg(long, global = true)]
    pub recipient: Option<String>,

    /// Payload JSON document (publish only).
    #[arg(long, global = true)]
    pub payload: Option<String>,

    /// Path to an armoured private key used to sign the published
    /// envelope (publish only); unsigned if omitted.
    #[arg(long, global = true)]
    pub signkey: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Commands {
    /// Subscribe to the configured subject and dispatch admitted
    /// envelopes to the configured command.
    Subscribe,
    /// Construct, optionally sign, and publish a single envelope.
    Publish,
    /// Print the version and exit.
    Version,
}
