//! Immutable runner configuration (spec §3 `RunnerSpec`).

use std::time::Duration;

use handlebars::Handlebars;

use crate::error::RunnerError;

const TEMPLATE_NAME: &str = "stdin";

/// Everything needed to invoke the configured command once. Built
/// once at startup and shared across dispatches; `Runner` itself
/// holds no per-invocation state (spec §4.6).
pub struct RunnerSpec {
    pub cmd: String,
    pub cmd_args: Vec<String>,
    pub timeout: Duration,
    engine: Handlebars<'static>,
}

impl RunnerSpec {
    pub fn new(
        cmd: impl Into<String>,
        cmd_args: Vec<String>,
        timeout: Duration,
        stdin_template: &str,
    ) -> Result<Self, RunnerError> {
        let mut engine = Handlebars::new();
        engine
            .register_template_string(TEMPLATE_NAME, stdin_template)
            .map_err(|e| RunnerError::InvalidTemplate(Box::new(e)))?;
        Ok(Self {
            cmd: cmd.into(),
            cmd_args,
            timeout,
            engine,
        })
    }

    pub fn render(&self, payload: &serde_json::Value) -> Result<Vec<u8>, RunnerError> {
        self.engine
            .render(TEMPLATE_NAME, payload)
            .map(String::into_bytes)
            .map_err(|e| RunnerError::TemplateRender(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_payload_fields() {
        let spec = RunnerSpec::new(
            "cat",
            vec![],
            Duration::from_secs(1),
            "host={{host}} check={{check_name}}",
        )
        .unwrap();
        let payload = serde_json::json!({"host": "db1", "check_name": "check_disk"});
        let rendered = spec.render(&payload).unwrap();
        assert_eq!(rendered, b"host=db1 check=check_disk");
    }

    #[test]
    fn invalid_template_is_rejected_at_construction() {
        let result = RunnerSpec::new("cat", vec![], Duration::from_secs(1), "{{#if}}");
        assert!(result.is_err());
    }
}
