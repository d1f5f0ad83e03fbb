//! Bus-level errors (spec §4.8 "failure semantics", §7 "transport error").

use thiserror::Error;

/// Transport errors. Connect and subscribe failures are fatal at
/// startup (spec §7); everything after that is handled by
/// `async-nats`'s own reconnect loop and never surfaces here.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: async_nats::ConnectError,
    },

    #[error("failed to subscribe to `{subject}`: {source}")]
    Subscribe {
        subject: String,
        #[source]
        source: async_nats::SubscribeError,
    },

    #[error("failed to publish to `{subject}`: {source}")]
    Publish {
        subject: String,
        #[source]
        source: async_nats::PublishError,
    },

    #[error("failed to flush connection: {0}")]
    Flush(#[source] async_nats::FlushError),

    #[error("malformed envelope on the wire: {0}")]
    Decode(#[from] eh_wire::DecodeError),
}

pub type BusResult<T> = Result<T, BusError>;
