//! One-shot envelope construction, signing, and emission (spec §4.9).

use eh_bus::BusClient;
use eh_crypto::Signer;
use eh_wire::Envelope;

use crate::error::{DispatchError, DispatchResult};

/// Builds, optionally signs, and publishes a single envelope, then is
/// done. Validates `payload` parses as a JSON object of string values
/// before publishing — a structural sanity check whose decoded value
/// is otherwise discarded (spec §4.9).
pub struct Publisher {
    bus: BusClient,
    subject: String,
}

impl Publisher {
    pub fn new(bus: BusClient, subject: impl Into<String>) -> Self {
        Self {
            bus,
            subject: subject.into(),
        }
    }

    pub async fn publish(
        &self,
        sender: Vec<u8>,
        recipient: Vec<u8>,
        payload: Vec<u8>,
        signer: Option<&Signer>,
    ) -> DispatchResult<()> {
        validate_payload(&payload)?;

        let mut envelope = Envelope {
            sender,
            recipient,
            payload,
            signature: Vec::new(),
            correlation_id: None,
        };

        if let Some(signer) = signer {
            envelope.signature = signer.sign(&envelope.canonical_form())?;
        }

        self.bus.publish(&self.subject, &envelope).await?;
        Ok(())
    }
}

fn validate_payload(payload: &[u8]) -> DispatchResult<()> {
    let parsed: serde_json::Value =
        serde_json::from_slice(payload).map_err(|_| DispatchError::InvalidPublishPayload)?;
    let object = parsed
        .as_object()
        .ok_or(DispatchError::InvalidPublishPayload)?;
    if object.values().all(|v| v.is_string()) {
        Ok(())
    } else {
        Err(DispatchError::InvalidPublishPayload)
    }
}
