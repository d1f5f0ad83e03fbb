//! Subprocess execution: render, spawn, pipe, kill-on-timeout (spec §4.6).

use std::process::Stdio;

use tokio::io::{AsyncWriteExt, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{RunnerError, RunnerResult};
use crate::spec::RunnerSpec;

/// Stateless executor over a [`RunnerSpec`]. Serialising invocations
/// across dispatches is the coordinator's job (spec §4.6); `Runner`
/// itself holds nothing between calls to [`Runner::run`].
pub struct Runner {
    spec: RunnerSpec,
}

impl Runner {
    pub fn new(spec: RunnerSpec) -> Self {
        Self { spec }
    }

    /// Render `payload` through the configured stdin template, run the
    /// command with a kill-on-timeout policy, and return the child's
    /// captured stdout.
    pub async fn run(&self, payload: &serde_json::Value) -> RunnerResult<Vec<u8>> {
        let stdin_bytes = self.spec.render(payload)?;

        let mut child = Command::new(&self.spec.cmd)
            .args(&self.spec.cmd_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                cmd: self.spec.cmd.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().expect("stdin was piped");
        stdin
            .write_all(&stdin_bytes)
            .await
            .map_err(RunnerError::StdinWrite)?;
        drop(stdin);

        let timeout_ms = self.spec.timeout.as_millis() as u64;
        let wait = async {
            let status = child.wait().await.map_err(RunnerError::Wait)?;
            let mut stdout_buf = Vec::new();
            if let Some(mut stdout) = child.stdout.take() {
                let _ = stdout.read_to_end(&mut stdout_buf).await;
            }
            RunnerResult::Ok((status, stdout_buf))
        };

        match timeout(self.spec.timeout, wait).await {
            Ok(Ok((status, stdout_buf))) => {
                if status.success() {
                    debug!(cmd = %self.spec.cmd, "runner invocation succeeded");
                    Ok(stdout_buf)
                } else {
                    Err(RunnerError::NonZeroExit(status))
                }
            }
            Ok(Err(err)) => Err(err),
            Err(_elapsed) => {
                warn!(cmd = %self.spec.cmd, timeout_ms, "runner invocation timed out, killing child");
                let _ = child.start_kill();
                let _ = child.wait().await;
                Err(RunnerError::Timeout { timeout_ms })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn successful_invocation_captures_stdout() {
        let spec = RunnerSpec::new(
            "cat",
            vec![],
            Duration::from_secs(2),
            "{{message}}",
        )
        .unwrap();
        let runner = Runner::new(spec);
        let payload = serde_json::json!({"message": "hello"});
        let stdout = runner.run(&payload).await.unwrap();
        assert_eq!(stdout, b"hello");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let spec = RunnerSpec::new("false", vec![], Duration::from_secs(2), "").unwrap();
        let runner = Runner::new(spec);
        let result = runner.run(&serde_json::json!({})).await;
        assert!(matches!(result, Err(RunnerError::NonZeroExit(_))));
    }

    #[tokio::test]
    async fn exceeding_timeout_kills_child_and_errors() {
        let spec = RunnerSpec::new(
            "sleep",
            vec!["10".to_string()],
            Duration::from_millis(200),
            "",
        )
        .unwrap();
        let runner = Runner::new(spec);
        let started = tokio::time::Instant::now();
        let result = runner.run(&serde_json::json!({})).await;
        assert!(matches!(result, Err(RunnerError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unknown_command_is_a_spawn_error() {
        let spec = RunnerSpec::new(
            "definitely-not-a-real-command",
            vec![],
            Duration::from_secs(1),
            "",
        )
        .unwrap();
        let runner = Runner::new(spec);
        let result = runner.run(&serde_json::json!({})).await;
        assert!(matches!(result, Err(RunnerError::Spawn { .. })));
    }
}
