//! Envelope type and wire codec (spec §3, §4.1, §6).

mod encoding;
mod envelope;
mod error;

pub use encoding::{decode_envelope, encode_envelope};
pub use envelope::Envelope;
pub use error::{DecodeError, DecodeResult};
