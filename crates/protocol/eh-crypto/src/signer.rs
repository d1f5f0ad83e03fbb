//! Detached-signature creation for the publisher (spec §4.2, §4.9).

use std::io::{Read, Write};

use sequoia_openpgp::armor::Kind;
use sequoia_openpgp::cert::CertParser;
use sequoia_openpgp::parse::Parse;
use sequoia_openpgp::policy::StandardPolicy;
use sequoia_openpgp::serialize::stream::{Armorer, Message, Signer as StreamSigner};
use sequoia_openpgp::Cert;

use crate::error::{CryptoError, CryptoResult};

/// Holds a single private entity — the first certificate in the parsed
/// private keyring — used to produce detached signatures.
pub struct Signer {
    cert: Cert,
}

impl Signer {
    /// Parse a private keyring and keep its first entity.
    pub fn from_reader(mut reader: impl Read) -> CryptoResult<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| CryptoError::KeyringParse(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a private keyring from an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let cert = CertParser::from_bytes(bytes)
            .map_err(|e| CryptoError::KeyringParse(e.to_string()))?
            .next()
            .ok_or(CryptoError::EmptyKeyring)?
            .map_err(|e| CryptoError::KeyringParse(e.to_string()))?;
        Ok(Self { cert })
    }

    /// Sign `message`, returning an ASCII-armoured detached signature.
    ///
    /// Fails if the entity has no component key with signing
    /// capability, or if the secret key material is unavailable.
    pub fn sign(&self, message: &[u8]) -> CryptoResult<Vec<u8>> {
        let policy = StandardPolicy::new();
        let keypair = self
            .cert
            .keys()
            .with_policy(&policy, None)
            .secret()
            .for_signing()
            .next()
            .ok_or(CryptoError::NotSigningCapable)?
            .key()
            .clone()
            .into_keypair()
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let mut sink = Vec::new();
        {
            let sink_message = Message::new(&mut sink);
            let sink_message = Armorer::new(sink_message)
                .kind(Kind::Signature)
                .build()
                .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
            let mut signer = StreamSigner::new(sink_message, keypair)
                .detached()
                .build()
                .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
            signer
                .write_all(message)
                .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
            signer
                .finalize()
                .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        }
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keyring_is_rejected() {
        let result = Signer::from_bytes(b"");
        assert!(matches!(result, Err(CryptoError::EmptyKeyring) | Err(CryptoError::KeyringParse(_))));
    }
}
