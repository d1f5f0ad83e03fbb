//! Dispatch-level errors: coordinator startup and publisher failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("bus error: {0}")]
    Bus(#[from] eh_bus::BusError),

    #[error("payload is not a JSON object of string values")]
    InvalidPublishPayload,

    #[error("signing failed: {0}")]
    Signing(#[from] eh_crypto::CryptoError),

    #[error("coordinator state transition `{attempted}` is invalid from `{current}`")]
    InvalidTransition {
        current: &'static str,
        attempted: &'static str,
    },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
