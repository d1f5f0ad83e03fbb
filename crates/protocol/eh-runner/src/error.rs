//! Runner errors: everything that can go wrong invoking the configured
//! command once (spec §4.6, §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid stdin template: {0}")]
    InvalidTemplate(#[source] Box<handlebars::TemplateError>),

    #[error("failed to render stdin template: {0}")]
    TemplateRender(#[source] Box<handlebars::RenderError>),

    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to child stdin: {0}")]
    StdinWrite(#[source] std::io::Error),

    #[error("command timed out after {timeout_ms}ms and was killed")]
    Timeout { timeout_ms: u64 },

    #[error("failed waiting for child process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("command exited with non-zero status: {0}")]
    NonZeroExit(std::process::ExitStatus),
}

pub type RunnerResult<T> = Result<T, RunnerError>;
