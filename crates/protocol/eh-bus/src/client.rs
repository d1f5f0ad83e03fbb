//! Thin wrapper over an `async-nats` connection (spec §4.8, §6 "bus interface").

use eh_wire::{decode_envelope, encode_envelope, Envelope};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::{BusError, BusResult};

/// Owns a single NATS connection. Reconnect-on-transport-failure is
/// handled entirely by `async-nats` itself; this wrapper only adapts
/// its connect/subscribe/publish surface to encoded [`Envelope`]s.
pub struct BusClient {
    connection: async_nats::Client,
}

/// A decoded-envelope stream over one subject subscription.
pub struct EnvelopeSubscription {
    subscriber: async_nats::Subscriber,
    subject: String,
}

impl BusClient {
    pub async fn connect(url: &str) -> BusResult<Self> {
        let connection =
            async_nats::connect(url)
                .await
                .map_err(|source| BusError::Connect {
                    url: url.to_string(),
                    source,
                })?;
        debug!(url, "connected to bus");
        Ok(Self { connection })
    }

    pub async fn subscribe(&self, subject: &str) -> BusResult<EnvelopeSubscription> {
        let subscriber = self
            .connection
            .subscribe(subject.to_string())
            .await
            .map_err(|source| BusError::Subscribe {
                subject: subject.to_string(),
                source,
            })?;
        Ok(EnvelopeSubscription {
            subscriber,
            subject: subject.to_string(),
        })
    }

    pub async fn publish(&self, subject: &str, envelope: &Envelope) -> BusResult<()> {
        let bytes = encode_envelope(envelope);
        self.connection
            .publish(subject.to_string(), bytes.into())
            .await
            .map_err(|source| BusError::Publish {
                subject: subject.to_string(),
                source,
            })?;
        self.connection.flush().await.map_err(BusError::Flush)?;
        Ok(())
    }
}

impl EnvelopeSubscription {
    /// Await the next envelope on this subscription. Returns `None`
    /// once the subscriber is unsubscribed or the connection is
    /// permanently closed; a malformed frame on the wire is a decode
    /// error for that one message, not a stream failure (spec §7
    /// "decode error").
    pub async fn next(&mut self) -> Option<BusResult<Envelope>> {
        let message = self.subscriber.next().await?;
        match decode_envelope(&message.payload) {
            Ok(envelope) => Some(Ok(envelope)),
            Err(err) => {
                warn!(subject = %self.subject, error = %err, "dropping malformed envelope");
                Some(Err(BusError::Decode(err)))
            }
        }
    }
}
