//! Signature verifier/signer error types.

use thiserror::Error;

/// Errors raised while loading a keyring or performing a signing
/// operation.
///
/// Verification failures are deliberately *not* represented here: per
/// spec §4.2, `verify` folds every failure mode (malformed signature,
/// missing key, mismatch) into a single non-match outcome at the
/// matcher layer, so this type only needs to describe what can go
/// wrong while *constructing* a verifier/signer or while *signing*.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The armoured keyring could not be parsed.
    #[error("failed to parse keyring: {0}")]
    KeyringParse(String),

    /// The keyring contained no certificates.
    #[error("keyring is empty")]
    EmptyKeyring,

    /// The signer's certificate has no component key with signing
    /// capability.
    #[error("signing key lacks signing capability")]
    NotSigningCapable,

    /// Signing failed for a reason other than key selection (I/O,
    /// `sequoia-openpgp` internal error).
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Result type alias using [`CryptoError`].
pub type CryptoResult<T> = Result<T, CryptoError>;
