//! Sign with a generated key, verify with its public half (spec §4.2, §4.9).

use sequoia_openpgp::cert::prelude::*;
use sequoia_openpgp::serialize::Serialize;

use eh_crypto::{Signer, Verifier};

fn generate_signing_cert() -> sequoia_openpgp::Cert {
    let (cert, _revocation) = CertBuilder::new()
        .add_userid("dispatcher@example.org")
        .add_signing_subkey()
        .generate()
        .expect("key generation must succeed");
    cert
}

#[test]
fn signature_produced_by_signer_verifies_against_matching_public_cert() {
    let cert = generate_signing_cert();

    let mut secret_bytes = Vec::new();
    cert.as_tsk()
        .armored()
        .serialize(&mut secret_bytes)
        .expect("secret key must serialize");
    let mut public_bytes = Vec::new();
    cert.armored()
        .serialize(&mut public_bytes)
        .expect("public cert must serialize");

    let signer = Signer::from_bytes(&secret_bytes).expect("signer must load generated key");
    let verifier = Verifier::from_bytes(&public_bytes).expect("verifier must load public cert");

    let message = b"sender||recipient||payload";
    let signature = signer.sign(message).expect("signing must succeed");

    assert!(verifier.verify(message, &signature).is_ok());
}

#[test]
fn signature_does_not_verify_against_a_different_key() {
    let signing_cert = generate_signing_cert();
    let other_cert = generate_signing_cert();

    let mut secret_bytes = Vec::new();
    signing_cert
        .as_tsk()
        .armored()
        .serialize(&mut secret_bytes)
        .expect("secret key must serialize");
    let mut other_public_bytes = Vec::new();
    other_cert
        .armored()
        .serialize(&mut other_public_bytes)
        .expect("public cert must serialize");

    let signer = Signer::from_bytes(&secret_bytes).expect("signer must load generated key");
    let verifier =
        Verifier::from_bytes(&other_public_bytes).expect("verifier must load public cert");

    let message = b"sender||recipient||payload";
    let signature = signer.sign(message).expect("signing must succeed");

    assert!(verifier.verify(message, &signature).is_err());
}

#[test]
fn signature_does_not_verify_a_tampered_message() {
    let cert = generate_signing_cert();

    let mut secret_bytes = Vec::new();
    cert.as_tsk()
        .armored()
        .serialize(&mut secret_bytes)
        .expect("secret key must serialize");
    let mut public_bytes = Vec::new();
    cert.armored()
        .serialize(&mut public_bytes)
        .expect("public cert must serialize");

    let signer = Signer::from_bytes(&secret_bytes).expect("signer must load generated key");
    let verifier = Verifier::from_bytes(&public_bytes).expect("verifier must load public cert");

    let signature = signer
        .sign(b"sender||recipient||payload")
        .expect("signing must succeed");

    assert!(verifier
        .verify(b"sender||recipient||TAMPERED", &signature)
        .is_err());
}
