//! Value retrievers: extract a byte string from an envelope (spec §4.3).

use eh_wire::Envelope;
use handlebars::Handlebars;
use serde_json::Value as JsonValue;

use crate::error::{FilterError, RetrievalError};

/// Result of a retrieval. `missing` is first-class and distinct from
/// an error: a matcher that sees `Missing` treats it as a non-match,
/// never as a pipeline failure.
pub enum Retrieved {
    Value(Vec<u8>),
    Missing,
}

/// The closed set of envelope fields a field retriever may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeField {
    Sender,
    Recipient,
    Payload,
    Signature,
}

impl EnvelopeField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sender" => Some(Self::Sender),
            "recipient" => Some(Self::Recipient),
            "payload" => Some(Self::Payload),
            "signature" => Some(Self::Signature),
            _ => None,
        }
    }
}

/// A compiled value retriever. The variant set is closed at design
/// time, so a tagged union is preferred over a trait object (spec
/// §9).
pub enum Retriever {
    /// Read one of the four fixed envelope fields. An unrecognized
    /// field name is not a construction error: it is held as-is and
    /// resolves to `Retrieved::Missing` at evaluation time (spec
    /// §4.3).
    Envelope { field: String },
    /// Decode `payload` as a JSON object of string values and read
    /// one key.
    PayloadMap { key: String },
    /// Decode `payload` as an arbitrary JSON value and render a
    /// compiled template against it.
    PayloadTemplate { engine: Handlebars<'static> },
}

const TEMPLATE_NAME: &str = "retriever";

impl Retriever {
    pub fn envelope(field_name: impl Into<String>) -> Retriever {
        Retriever::Envelope {
            field: field_name.into(),
        }
    }

    pub fn payload_map(key: impl Into<String>) -> Retriever {
        Retriever::PayloadMap { key: key.into() }
    }

    pub fn payload_template(template: &str) -> Result<Retriever, FilterError> {
        let mut engine = Handlebars::new();
        engine
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|source| FilterError::InvalidTemplate {
                template: template.to_string(),
                source: Box::new(source),
            })?;
        Ok(Retriever::PayloadTemplate { engine })
    }

    pub fn get_value(&self, envelope: &Envelope) -> Result<Retrieved, RetrievalError> {
        match self {
            Retriever::Envelope { field } => {
                let bytes = match EnvelopeField::parse(field) {
                    Some(EnvelopeField::Sender) => &envelope.sender,
                    Some(EnvelopeField::Recipient) => &envelope.recipient,
                    Some(EnvelopeField::Payload) => &envelope.payload,
                    Some(EnvelopeField::Signature) => &envelope.signature,
                    None => return Ok(Retrieved::Missing),
                };
                Ok(Retrieved::Value(bytes.clone()))
            }
            Retriever::PayloadMap { key } => {
                let object: std::collections::HashMap<String, String> =
                    serde_json::from_slice(&envelope.payload)
                        .map_err(RetrievalError::MalformedPayloadJson)?;
                match object.get(key) {
                    None => Ok(Retrieved::Missing),
                    Some(value) => Ok(Retrieved::Value(value.clone().into_bytes())),
                }
            }
            Retriever::PayloadTemplate { engine, .. } => {
                let parsed: JsonValue = serde_json::from_slice(&envelope.payload)
                    .map_err(RetrievalError::MalformedPayloadJson)?;
                let rendered = engine
                    .render(TEMPLATE_NAME, &parsed)
                    .map_err(|e| RetrievalError::TemplateRender(Box::new(e)))?;
                Ok(Retrieved::Value(rendered.into_bytes()))
            }
        }
    }
}
