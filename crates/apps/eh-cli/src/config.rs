//! YAML configuration file (spec §6 "configuration file").

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub natsaddress: String,
    pub subject: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            natsaddress: eh_types::constants::DEFAULT_NATS_URL.to_string(),
            subject: eh_types::constants::DEFAULT_SUBJECT.to_string(),
        }
    }
}

/// The `command:` section. Present only when `subscribe` is run; a
/// `publish`-only invocation may omit it entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub cmd: String,
    #[serde(default)]
    pub cmdargs: Vec<String>,
    pub timeout: String,
    pub stdintemplate: String,
    #[serde(default)]
    pub blackout: Option<String>,
    #[serde(default)]
    pub maxdispatches: u64,
    #[serde(default)]
    pub filters: Vec<eh_filter::FilterSpec>,
}

impl CommandConfig {
    pub fn timeout(&self) -> CliResult<Duration> {
        parse_duration(&self.timeout)
    }

    pub fn blackout(&self) -> CliResult<Duration> {
        match &self.blackout {
            Some(raw) => parse_duration(raw),
            None => Ok(Duration::ZERO),
        }
    }
}

fn parse_duration(raw: &str) -> CliResult<Duration> {
    humantime::parse_duration(raw).map_err(|_| CliError::InvalidDuration(raw.to_string()))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EventHandlerConfig {
    pub global: GlobalConfig,
    pub command: Option<CommandConfig>,
}

impl EventHandlerConfig {
    /// Load from `path`, or fall back to defaults if the file doesn't
    /// exist (mirrors the reference config's documented behavior of
    /// working with no config file for simple `publish` invocations).
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: EventHandlerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}
