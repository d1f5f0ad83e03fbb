//! Declarative filter configuration, as read from the `filters:` list
//! in the YAML config (spec §3, §6).

use std::collections::HashMap;

use serde::Deserialize;

/// Retriever family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Envelope,
    #[serde(rename = "payload map")]
    PayloadMap,
    #[serde(rename = "payload template")]
    PayloadTemplate,
    Signature,
}

/// Matcher family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Regexp,
    Signature,
}

/// One element of a `filters:` list. `args` carries family-specific
/// keys (`field`, `regexp`, `template`, `verifykey`); validated when
/// the spec is compiled into a [`crate::matcher::Matcher`] by
/// [`crate::battery::FilterBattery::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub context: Context,
    #[serde(rename = "type")]
    pub kind: MatcherKind,
    #[serde(default)]
    pub args: HashMap<String, String>,
}

impl FilterSpec {
    pub fn arg(&self, key: &'static str, context: &'static str, kind: &'static str) -> Result<&str, crate::error::FilterError> {
        self.args
            .get(key)
            .map(String::as_str)
            .ok_or(crate::error::FilterError::MissingArg { context, kind, arg: key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_payload_map_regex_spec() {
        let yaml = r#"
context: "payload map"
type: regexp
args:
  field: check_name
  regexp: "check_.+"
"#;
        let spec: FilterSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.context, Context::PayloadMap);
        assert_eq!(spec.kind, MatcherKind::Regexp);
        assert_eq!(spec.args.get("field").unwrap(), "check_name");
    }

    #[test]
    fn deserializes_signature_spec() {
        let yaml = r#"
context: signature
type: signature
args:
  verifykey: /etc/eventhandler/verify.asc
"#;
        let spec: FilterSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.context, Context::Signature);
        assert_eq!(spec.kind, MatcherKind::Signature);
    }
}
