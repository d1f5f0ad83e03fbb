//! Wire format encoding and decoding for [`Envelope`] (spec §4.1, §6).
//!
//! Each field is framed as `[tag: u8][length: LEB128 varint][value: bytes]`.
//! Tag numbers are fixed: 1=sender, 2=recipient, 3=payload, 4=signature,
//! 5=correlation_id (additive, optional). Field order on the wire is not
//! semantically constrained; unknown tags are read and discarded so the
//! format is forward-compatible. Encoding is deterministic for equal
//! inputs: fields are always written in ascending tag order.

use eh_types::constants::MAX_ENVELOPE_SIZE;

use crate::envelope::Envelope;
use crate::error::{DecodeError, DecodeResult};

const TAG_SENDER: u8 = 1;
const TAG_RECIPIENT: u8 = 2;
const TAG_PAYLOAD: u8 = 3;
const TAG_SIGNATURE: u8 = 4;
const TAG_CORRELATION_ID: u8 = 5;

fn write_field(buf: &mut Vec<u8>, tag: u8, value: &[u8]) {
    buf.push(tag);
    write_varint(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

fn read_varint(bytes: &[u8], cursor: &mut usize) -> DecodeResult<u64> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = *bytes.get(*cursor).ok_or(DecodeError::Truncated {
            expected: *cursor + 1,
            got: bytes.len(),
        })?;
        *cursor += 1;
        result |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 64 {
            return Err(DecodeError::MalformedVarint);
        }
    }
}

/// Encode an envelope to its wire representation.
///
/// Encoding is deterministic: equal envelopes always produce identical
/// bytes, since fields are written in a fixed ascending-tag order.
pub fn encode_envelope(envelope: &Envelope) -> Vec<u8> {
    let mut buf = Vec::new();
    write_field(&mut buf, TAG_SENDER, &envelope.sender);
    write_field(&mut buf, TAG_RECIPIENT, &envelope.recipient);
    write_field(&mut buf, TAG_PAYLOAD, &envelope.payload);
    write_field(&mut buf, TAG_SIGNATURE, &envelope.signature);
    if let Some(correlation_id) = &envelope.correlation_id {
        write_field(&mut buf, TAG_CORRELATION_ID, correlation_id.as_bytes());
    }
    buf
}

/// Decode an envelope from its wire representation.
///
/// Unknown tag numbers are read and discarded. Fields whose tag is
/// absent decode to an empty byte string, mirroring the permissiveness
/// §4.1 grants to genuinely-empty fields.
pub fn decode_envelope(bytes: &[u8]) -> DecodeResult<Envelope> {
    let mut cursor = 0usize;
    let mut sender = None;
    let mut recipient = None;
    let mut payload = None;
    let mut signature = None;
    let mut correlation_id = None;

    while cursor < bytes.len() {
        let tag = bytes[cursor];
        cursor += 1;
        let len = read_varint(bytes, &mut cursor)? as usize;
        if len > MAX_ENVELOPE_SIZE {
            return Err(DecodeError::FieldTooLarge {
                size: len,
                max: MAX_ENVELOPE_SIZE,
            });
        }
        let end = cursor.checked_add(len).ok_or(DecodeError::Truncated {
            expected: cursor + len,
            got: bytes.len(),
        })?;
        if end > bytes.len() {
            return Err(DecodeError::Truncated {
                expected: end,
                got: bytes.len(),
            });
        }
        let value = &bytes[cursor..end];
        cursor = end;

        match tag {
            TAG_SENDER => sender = Some(value.to_vec()),
            TAG_RECIPIENT => recipient = Some(value.to_vec()),
            TAG_PAYLOAD => payload = Some(value.to_vec()),
            TAG_SIGNATURE => signature = Some(value.to_vec()),
            TAG_CORRELATION_ID => correlation_id = Some(eh_types::CorrelationId(value.to_vec())),
            _ => {} // unknown field, already skipped by advancing cursor
        }
    }

    Ok(Envelope {
        sender: sender.unwrap_or_default(),
        recipient: recipient.unwrap_or_default(),
        payload: payload.unwrap_or_default(),
        signature: signature.unwrap_or_default(),
        correlation_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            sender: b"nagios.example.com".to_vec(),
            recipient: b"eventhandler".to_vec(),
            payload: br#"{"check_name":"check_foo"}"#.to_vec(),
            signature: b"-----BEGIN PGP SIGNATURE-----".to_vec(),
            correlation_id: Some(eh_types::CorrelationId(b"corr-1".to_vec())),
        }
    }

    #[test]
    fn round_trip() {
        let env = sample();
        let encoded = encode_envelope(&env);
        let decoded = decode_envelope(&encoded).unwrap();
        assert_eq!(env, decoded);
    }

    #[test]
    fn round_trip_without_correlation_id() {
        let mut env = sample();
        env.correlation_id = None;
        let encoded = encode_envelope(&env);
        let decoded = decode_envelope(&encoded).unwrap();
        assert_eq!(env, decoded);
    }

    #[test]
    fn empty_byte_strings_round_trip() {
        let env = Envelope::default();
        let encoded = encode_envelope(&env);
        let decoded = decode_envelope(&encoded).unwrap();
        assert_eq!(env, decoded);
    }

    #[test]
    fn encoding_is_deterministic() {
        let env = sample();
        assert_eq!(encode_envelope(&env), encode_envelope(&env));
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let mut buf = encode_envelope(&sample());
        write_field(&mut buf, 99, b"from-the-future");
        let decoded = decode_envelope(&buf).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn missing_tags_default_to_empty() {
        let mut buf = Vec::new();
        write_field(&mut buf, TAG_PAYLOAD, b"{}");
        let decoded = decode_envelope(&buf).unwrap();
        assert_eq!(decoded.sender, Vec::<u8>::new());
        assert_eq!(decoded.payload, b"{}".to_vec());
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let mut buf = encode_envelope(&sample());
        buf.truncate(buf.len() - 1);
        assert!(matches!(decode_envelope(&buf), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn oversized_field_length_is_rejected() {
        let mut buf = Vec::new();
        buf.push(TAG_PAYLOAD);
        write_varint(&mut buf, (MAX_ENVELOPE_SIZE + 1) as u64);
        assert!(matches!(
            decode_envelope(&buf),
            Err(DecodeError::FieldTooLarge { .. })
        ));
    }

    #[test]
    fn varint_round_trips_large_values() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 300);
        let mut cursor = 0;
        assert_eq!(read_varint(&buf, &mut cursor).unwrap(), 300);
    }
}
