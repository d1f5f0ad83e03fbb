//! Filter construction and evaluation errors.

use thiserror::Error;

/// Errors raised while compiling a [`crate::spec::FilterSpec`] into a
/// matcher, or while reading the fixed resources (regex, verify key)
/// that compilation needs.
///
/// Construction-time failures are fatal at startup (spec §7); they are
/// kept separate from [`RetrievalError`] so callers can tell "the
/// config is broken" from "this one envelope's payload is broken".
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter battery must not be empty")]
    EmptyBattery,

    #[error("missing required arg `{arg}` for context={context}, type={kind}")]
    MissingArg {
        context: &'static str,
        kind: &'static str,
        arg: &'static str,
    },

    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid template `{template}`: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("unable to read verify key `{path}`: {source}")]
    VerifyKeyUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid verify key `{path}`: {source}")]
    VerifyKeyInvalid {
        path: String,
        #[source]
        source: eh_crypto::CryptoError,
    },

    #[error("context=signature requires type=signature")]
    ContextTypeMismatch,

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// Errors surfaced while retrieving a value from an envelope at
/// evaluation time (spec §4.3). Distinct from a `missing` outcome,
/// which is not an error at all.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("payload is not valid JSON: {0}")]
    MalformedPayloadJson(#[source] serde_json::Error),

    #[error("template render failed: {0}")]
    TemplateRender(#[source] Box<handlebars::RenderError>),
}

pub type FilterResult<T> = Result<T, FilterError>;
