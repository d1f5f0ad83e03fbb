//! OpenPGP detached-signature verification and signing (spec §4.2, §4.9).

mod error;
mod signer;
mod verifier;

pub use error::{CryptoError, CryptoResult};
pub use signer::Signer;
pub use verifier::Verifier;
