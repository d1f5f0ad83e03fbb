//! The envelope: the unit of transport carried over the bus (spec §3).

use eh_types::CorrelationId;

/// A bus envelope.
///
/// Immutable once received — nothing in this crate or in `eh-filter`
/// mutates an `Envelope` after it has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    /// Origin identity, opaque to the core.
    pub sender: Vec<u8>,
    /// Intended destination identity.
    pub recipient: Vec<u8>,
    /// Opaque payload, expected to be UTF-8 JSON.
    pub payload: Vec<u8>,
    /// ASCII-armoured detached OpenPGP signature, or empty if unsigned.
    pub signature: Vec<u8>,
    /// Opaque tag propagated to logs, never covered by the signature.
    pub correlation_id: Option<CorrelationId>,
}

impl Envelope {
    /// Build the canonical byte form covered by signatures: the fixed
    /// concatenation `sender || recipient || payload`, with no
    /// separators. Neither the signature nor the correlation id ever
    /// participate in this form.
    pub fn canonical_form(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.sender.len() + self.recipient.len() + self.payload.len());
        buf.extend_from_slice(&self.sender);
        buf.extend_from_slice(&self.recipient);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_concatenates_in_fixed_order() {
        let env = Envelope {
            sender: b"s".to_vec(),
            recipient: b"r".to_vec(),
            payload: b"p".to_vec(),
            signature: b"sig".to_vec(),
            correlation_id: Some(CorrelationId(b"corr".to_vec())),
        };
        assert_eq!(env.canonical_form(), b"srp".to_vec());
    }

    #[test]
    fn canonical_form_ignores_signature_and_correlation_id() {
        let mut env = Envelope {
            sender: b"s".to_vec(),
            recipient: b"r".to_vec(),
            payload: b"p".to_vec(),
            signature: b"sig-a".to_vec(),
            correlation_id: Some(CorrelationId(b"a".to_vec())),
        };
        let base = env.canonical_form();
        env.signature = b"sig-b".to_vec();
        env.correlation_id = Some(CorrelationId(b"b".to_vec()));
        assert_eq!(env.canonical_form(), base);
    }
}
