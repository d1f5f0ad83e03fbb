//! `eventhandler publish`: build, optionally sign, and emit one envelope (spec §4.9).

use eh_bus::BusClient;
use eh_crypto::Signer;
use eh_dispatch::Publisher;
use tracing::info;

use crate::cli::Cli;
use crate::config::EventHandlerConfig;
use crate::error::{CliError, CliResult};

pub async fn run(cli: &Cli, config: &EventHandlerConfig) -> CliResult<()> {
    let nats_url = cli
        .nats_url
        .clone()
        .unwrap_or_else(|| config.global.natsaddress.clone());
    let subject = cli
        .subject
        .clone()
        .unwrap_or_else(|| config.global.subject.clone());

    let sender = cli
        .sender
        .clone()
        .ok_or_else(|| CliError::Config("--sender is required for publish".to_string()))?;
    let recipient = cli
        .recipient
        .clone()
        .ok_or_else(|| CliError::Config("--recipient is required for publish".to_string()))?;
    let payload = cli
        .payload
        .clone()
        .ok_or_else(|| CliError::Config("--payload is required for publish".to_string()))?;

    let signer = match &cli.signkey {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            Some(Signer::from_bytes(&bytes)?)
        }
        None => None,
    };

    let bus = BusClient::connect(&nats_url).await?;
    let publisher = Publisher::new(bus, subject.clone());
    publisher
        .publish(
            sender.into_bytes(),
            recipient.into_bytes(),
            payload.into_bytes(),
            signer.as_ref(),
        )
        .await?;

    info!(%subject, signed = signer.is_some(), "published envelope");
    Ok(())
}
