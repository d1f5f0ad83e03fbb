//! Envelope codec error types.

use thiserror::Error;

/// Errors raised while decoding an envelope from the wire format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended in the middle of a tag, length, or value.
    #[error("truncated envelope: expected at least {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    /// A length-delimited field declared a length that would overflow
    /// the envelope size guard.
    #[error("field too large: {size} bytes exceeds maximum of {max}")]
    FieldTooLarge { size: usize, max: usize },

    /// A varint did not terminate within the maximum number of bytes a
    /// `u64` length can occupy.
    #[error("malformed varint")]
    MalformedVarint,
}

/// Result type alias using [`DecodeError`].
pub type DecodeResult<T> = Result<T, DecodeError>;
