//! NATS subject subscribe/publish wrapper for encoded envelopes (spec §6 "bus interface").

mod client;
mod error;

pub use client::{BusClient, EnvelopeSubscription};
pub use error::{BusError, BusResult};
