//! Detached-signature verification over a loaded public keyring (spec §4.2).

use std::io::Read;

use sequoia_openpgp::cert::CertParser;
use sequoia_openpgp::parse::stream::{
    DetachedVerifierBuilder, MessageStructure, VerificationHelper,
};
use sequoia_openpgp::parse::Parse;
use sequoia_openpgp::policy::StandardPolicy;
use sequoia_openpgp::{Cert, KeyHandle};

use crate::error::{CryptoError, CryptoResult};

/// Holds an immutable keyring parsed from an armoured public keyring
/// stream. Safe for concurrent reads once constructed.
pub struct Verifier {
    certs: Vec<Cert>,
}

struct Helper<'a> {
    certs: &'a [Cert],
}

impl VerificationHelper for Helper<'_> {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> sequoia_openpgp::Result<Vec<Cert>> {
        Ok(self.certs.to_vec())
    }

    fn check(&mut self, structure: MessageStructure) -> sequoia_openpgp::Result<()> {
        for layer in structure.into_iter() {
            if let sequoia_openpgp::parse::stream::MessageLayer::SignatureGroup { results } = layer {
                if results.into_iter().any(|r| r.is_ok()) {
                    return Ok(());
                }
            }
        }
        Err(anyhow_like("no valid signature found"))
    }
}

fn anyhow_like(msg: &str) -> anyhow::Error {
    anyhow::anyhow!("{msg}")
}

impl Verifier {
    /// Parse an armoured keyring (one or more OpenPGP certificates)
    /// from a byte stream.
    pub fn from_reader(mut reader: impl Read) -> CryptoResult<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| CryptoError::KeyringParse(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse an armoured keyring from an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let certs: Vec<Cert> = CertParser::from_bytes(bytes)
            .map_err(|e| CryptoError::KeyringParse(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        if certs.is_empty() {
            return Err(CryptoError::EmptyKeyring);
        }
        Ok(Self { certs })
    }

    /// Verify a detached, armoured signature over `message`.
    ///
    /// Returns `Ok(())` when the signature was produced by a key in the
    /// keyring and covers exactly `message`. Any failure — malformed
    /// signature, unknown issuer, mismatch — is folded into `Err`; per
    /// spec §4.2 the caller (the signature matcher) turns that into a
    /// non-match rather than a pipeline error.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> sequoia_openpgp::Result<()> {
        let policy = StandardPolicy::new();
        let helper = Helper { certs: &self.certs };
        let mut verifier = DetachedVerifierBuilder::from_bytes(signature)?
            .with_policy(&policy, None, helper)?;
        verifier.verify_bytes(message)
    }

    /// Number of certificates held in the keyring.
    pub fn key_count(&self) -> usize {
        self.certs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keyring_is_rejected() {
        let result = Verifier::from_bytes(b"");
        assert!(matches!(result, Err(CryptoError::EmptyKeyring) | Err(CryptoError::KeyringParse(_))));
    }
}
