//! `eventhandler subscribe`: bus -> filter battery -> admission -> runner (spec §4.6-§4.8).

use async_trait::async_trait;
use eh_bus::BusClient;
use eh_dispatch::{Coordinator, DispatchAction, DispatchState};
use eh_filter::FilterBattery;
use eh_runner::{Runner, RunnerSpec};
use eh_wire::Envelope;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::EventHandlerConfig;
use crate::error::{CliError, CliResult};
use crate::signals::wait_for_shutdown_signal;

struct RunnerAction {
    runner: Runner,
}

#[async_trait]
impl DispatchAction for RunnerAction {
    async fn invoke(&self, envelope: &Envelope) -> anyhow::Result<()> {
        let payload: serde_json::Value = serde_json::from_slice(&envelope.payload)?;
        let stdout = self.runner.run(&payload).await?;
        if !stdout.is_empty() {
            info!(bytes = stdout.len(), "runner produced stdout");
        }
        Ok(())
    }
}

pub async fn run(cli: &Cli, config: &EventHandlerConfig) -> CliResult<()> {
    let command = config
        .command
        .as_ref()
        .ok_or_else(|| CliError::Config("subscribe requires a `command:` section".to_string()))?;

    let nats_url = cli
        .nats_url
        .clone()
        .unwrap_or_else(|| config.global.natsaddress.clone());
    let subject = cli
        .subject
        .clone()
        .unwrap_or_else(|| config.global.subject.clone());

    let battery = FilterBattery::new(&command.filters)?;
    let runner_spec = RunnerSpec::new(
        command.cmd.clone(),
        command.cmdargs.clone(),
        command.timeout()?,
        &command.stdintemplate,
    )?;
    let action = RunnerAction {
        runner: Runner::new(runner_spec),
    };

    let bus = BusClient::connect(&nats_url).await?;
    let dispatch_state = DispatchState::new(command.blackout()?, command.maxdispatches);
    let mut coordinator = Coordinator::new(bus, dispatch_state);

    coordinator.listen(&subject).await?;
    info!(%nats_url, %subject, "listening for envelopes");

    let shutdown = tokio::spawn(async move {
        wait_for_shutdown_signal().await;
    });

    tokio::select! {
        result = coordinator.dispatch(&battery, &action) => {
            result?;
        }
        _ = shutdown => {
            info!("shutdown signal received");
        }
    }

    coordinator.shutdown();
    info!(dispatches = coordinator.dispatches(), "shut down cleanly");
    Ok(())
}
