//! Matchers: test a retrieved value, or a signature, against a predicate (spec §4.4).

use eh_crypto::Verifier;
use eh_wire::Envelope;
use regex::bytes::Regex;

use crate::error::FilterError;
use crate::retriever::{Retrieved, Retriever};

/// A compiled matcher. Like [`crate::retriever::Retriever`], the
/// variant set is closed: regex over a retrieved value, or detached-
/// signature verification over the envelope's canonical form.
pub enum Matcher {
    Regex { retriever: Retriever, regex: Regex },
    Signature { verifier: Verifier },
}

impl Matcher {
    pub fn regex(retriever: Retriever, pattern: &str) -> Result<Matcher, FilterError> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Matcher::Regex { retriever, regex })
    }

    pub fn signature(verifier: Verifier) -> Matcher {
        Matcher::Signature { verifier }
    }

    /// Evaluate the matcher against `envelope`.
    ///
    /// A retriever's `missing` result is false, not an error (spec
    /// §4.4, §8 "retriever missing → non-match"). A verifier error is
    /// likewise folded into `false` rather than propagated (spec
    /// §4.4, §9 "silent drop is the conservative default").
    pub fn matches(&self, envelope: &Envelope) -> Result<bool, FilterError> {
        match self {
            Matcher::Regex { retriever, regex } => match retriever.get_value(envelope)? {
                Retrieved::Value(bytes) => Ok(regex.is_match(&bytes)),
                Retrieved::Missing => Ok(false),
            },
            Matcher::Signature { verifier } => {
                let canonical = envelope.canonical_form();
                Ok(verifier.verify(&canonical, &envelope.signature).is_ok())
            }
        }
    }
}
