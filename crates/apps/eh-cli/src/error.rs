//! CLI error type wrapping every lower crate (spec §7).

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid duration `{0}`")]
    InvalidDuration(String),

    #[error("{0}")]
    Filter(#[from] eh_filter::FilterError),

    #[error("{0}")]
    Runner(#[from] eh_runner::RunnerError),

    #[error("{0}")]
    Bus(#[from] eh_bus::BusError),

    #[error("{0}")]
    Dispatch(#[from] eh_dispatch::DispatchError),

    #[error("{0}")]
    Crypto(#[from] eh_crypto::CryptoError),
}
