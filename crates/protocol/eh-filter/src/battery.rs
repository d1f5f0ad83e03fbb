//! Conjunctive composition of matchers (spec §4.5).

use eh_crypto::Verifier;
use eh_wire::Envelope;

use crate::error::FilterError;
use crate::matcher::Matcher;
use crate::retriever::Retriever;
use crate::spec::{Context, FilterSpec, MatcherKind};

/// An ordered, non-empty sequence of compiled matchers. Matches are
/// evaluated in order and short-circuit on the first non-match.
pub struct FilterBattery {
    matchers: Vec<Matcher>,
}

impl FilterBattery {
    /// Compile a list of [`FilterSpec`]s into a battery. Validates
    /// mandatory args, compiles regexes, and loads verify keys up
    /// front, so every failure here is a startup-time configuration
    /// error (spec §4.5, §7).
    pub fn new(specs: &[FilterSpec]) -> Result<Self, FilterError> {
        if specs.is_empty() {
            return Err(FilterError::EmptyBattery);
        }
        let matchers = specs.iter().map(compile).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    /// Evaluate the battery against `envelope`. Short-circuits on the
    /// first `false`; any matcher error aborts evaluation and
    /// propagates (spec §4.5).
    pub fn matches(&self, envelope: &Envelope) -> Result<bool, FilterError> {
        for matcher in &self.matchers {
            if !matcher.matches(envelope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

fn compile(spec: &FilterSpec) -> Result<Matcher, FilterError> {
    match (spec.context, spec.kind) {
        (Context::Signature, MatcherKind::Signature) => {
            let path = spec.arg("verifykey", "signature", "signature")?;
            let keyring = std::fs::read(path).map_err(|source| FilterError::VerifyKeyUnreadable {
                path: path.to_string(),
                source,
            })?;
            let verifier =
                Verifier::from_bytes(&keyring).map_err(|source| FilterError::VerifyKeyInvalid {
                    path: path.to_string(),
                    source,
                })?;
            Ok(Matcher::signature(verifier))
        }
        (_, MatcherKind::Signature) => Err(FilterError::ContextTypeMismatch),
        (Context::Signature, MatcherKind::Regexp) => Err(FilterError::ContextTypeMismatch),
        (Context::Envelope, MatcherKind::Regexp) => {
            let field = spec.arg("field", "envelope", "regexp")?;
            let pattern = spec.arg("regexp", "envelope", "regexp")?;
            Matcher::regex(Retriever::envelope(field), pattern)
        }
        (Context::PayloadMap, MatcherKind::Regexp) => {
            let key = spec.arg("field", "payload map", "regexp")?;
            let pattern = spec.arg("regexp", "payload map", "regexp")?;
            Matcher::regex(Retriever::payload_map(key), pattern)
        }
        (Context::PayloadTemplate, MatcherKind::Regexp) => {
            let template = spec.arg("template", "payload template", "regexp")?;
            let pattern = spec.arg("regexp", "payload template", "regexp")?;
            Matcher::regex(Retriever::payload_template(template)?, pattern)
        }
    }
}
