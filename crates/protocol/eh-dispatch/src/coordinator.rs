//! Subscription plumbing, dispatch loop, shutdown protocol (spec §4.8).

use std::time::Instant;

use async_trait::async_trait;
use eh_bus::BusClient;
use eh_filter::FilterBattery;
use eh_wire::Envelope;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::admission::{Admission, DispatchState};
use crate::error::{DispatchError, DispatchResult};

/// Caller-supplied adapter invoked on each admitted envelope: decodes
/// the payload and drives the runner (spec §4.8 `dispatch(battery,
/// action)`).
#[async_trait]
pub trait DispatchAction: Send + Sync {
    async fn invoke(&self, envelope: &Envelope) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Constructed,
    Listening,
    Dispatching,
    ShuttingDown,
    Closed,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Constructed => "constructed",
            State::Listening => "listening",
            State::Dispatching => "dispatching",
            State::ShuttingDown => "shutting-down",
            State::Closed => "closed",
        }
    }
}

/// Mediates between the bus subscription and the command runner.
/// Transitions one-way: `constructed -> listening -> dispatching ->
/// shutting-down -> closed`.
pub struct Coordinator {
    bus: Option<BusClient>,
    state: State,
    envelope_rx: Option<mpsc::Receiver<Envelope>>,
    done_tx: watch::Sender<bool>,
    done_rx: watch::Receiver<bool>,
    dispatch_state: DispatchState,
}

/// Channel capacity for the envelope handoff. `tokio::sync::mpsc` has
/// no true zero-capacity rendezvous variant; capacity 1 means at most
/// one envelope sits ahead of the one the dispatch loop is actively
/// processing, which reproduces the synchronous-rendezvous
/// backpressure of spec §5 closely enough that no unbounded internal
/// queue can build up.
const ENVELOPE_CHANNEL_CAPACITY: usize = 1;

impl Coordinator {
    pub fn new(bus: BusClient, dispatch_state: DispatchState) -> Self {
        let (done_tx, done_rx) = watch::channel(false);
        Self {
            bus: Some(bus),
            state: State::Constructed,
            envelope_rx: None,
            done_tx,
            done_rx,
            dispatch_state,
        }
    }

    /// Register a subscription and spawn the task that pushes decoded
    /// envelopes onto the internal channel. Bus subscribe failures are
    /// fatal and returned to the caller (spec §7).
    pub async fn listen(&mut self, subject: &str) -> DispatchResult<()> {
        self.require_state(State::Constructed, "listen")?;

        let bus = self.bus.as_ref().expect("bus present before shutdown");
        let mut subscription = bus.subscribe(subject).await?;

        let (tx, rx) = mpsc::channel(ENVELOPE_CHANNEL_CAPACITY);
        let mut done_rx = self.done_rx.clone();

        tokio::spawn(async move {
            loop {
                match subscription.next().await {
                    Some(Ok(envelope)) => {
                        tokio::select! {
                            result = tx.send(envelope) => {
                                if result.is_err() {
                                    break;
                                }
                            }
                            _ = done_rx.changed() => {
                                break;
                            }
                        }
                    }
                    Some(Err(err)) => {
                        warn!(error = %err, "skipping envelope that failed to decode");
                    }
                    None => break,
                }
            }
        });

        self.envelope_rx = Some(rx);
        self.state = State::Listening;
        Ok(())
    }

    /// Drive the dispatch loop until the envelope channel closes
    /// (either the subscription ended or [`Coordinator::shutdown`] was
    /// called). For each envelope: evaluate the battery, run admission
    /// control, invoke `action`, and update dispatch state.
    pub async fn dispatch(
        &mut self,
        battery: &FilterBattery,
        action: &dyn DispatchAction,
    ) -> DispatchResult<()> {
        self.require_state(State::Listening, "dispatch")?;
        self.state = State::Dispatching;

        let mut rx = self
            .envelope_rx
            .take()
            .expect("envelope channel present after listen");

        loop {
            if *self.done_rx.borrow() {
                break;
            }

            let envelope = match rx.recv().await {
                Some(envelope) => envelope,
                None => break,
            };

            match battery.matches(&envelope) {
                Ok(true) => self.try_dispatch(&envelope, action).await,
                Ok(false) => {
                    info!("envelope did not match filter battery, skipping");
                }
                Err(err) => {
                    warn!(error = %err, "filter error on envelope, skipping");
                }
            }
        }

        self.envelope_rx = Some(rx);
        Ok(())
    }

    async fn try_dispatch(&mut self, envelope: &Envelope, action: &dyn DispatchAction) {
        let now = Instant::now();
        match self.dispatch_state.check(now) {
            Admission::RejectedBlackout => {
                info!("dispatch rejected: blackout window active");
                return;
            }
            Admission::RejectedCap => {
                info!("dispatch rejected: lifetime dispatch cap reached");
                return;
            }
            Admission::Admit => {}
        }

        if let Err(err) = action.invoke(envelope).await {
            warn!(error = %err, "runner invocation failed");
        }
        self.dispatch_state.record_dispatch(Instant::now());
    }

    /// Close the done channel, the envelope channel, and the bus
    /// connection, in that order. Not idempotent; call exactly once.
    pub fn shutdown(&mut self) {
        self.state = State::ShuttingDown;
        let _ = self.done_tx.send(true);
        self.envelope_rx = None;
        self.bus = None;
        self.state = State::Closed;
    }

    pub fn dispatches(&self) -> u64 {
        self.dispatch_state.dispatches()
    }

    fn require_state(&self, expected: State, op: &'static str) -> DispatchResult<()> {
        if self.state != expected {
            return Err(DispatchError::InvalidTransition {
                current: self.state.name(),
                attempted: op,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use eh_filter::FilterSpec;
    use tokio::sync::mpsc;

    use super::*;

    /// Builds a `Coordinator` without a live bus, wiring its envelope
    /// channel directly so tests can stand in for what `listen()` would
    /// otherwise populate from a subscription.
    fn coordinator_without_bus(dispatch_state: DispatchState) -> (Coordinator, mpsc::Sender<Envelope>) {
        let (tx, rx) = mpsc::channel(8);
        let (done_tx, done_rx) = watch::channel(false);
        let coordinator = Coordinator {
            bus: None,
            state: State::Listening,
            envelope_rx: Some(rx),
            done_tx,
            done_rx,
            dispatch_state,
        };
        (coordinator, tx)
    }

    fn envelope_with_sender(sender: &str) -> Envelope {
        Envelope {
            sender: sender.as_bytes().to_vec(),
            recipient: b"dispatcher".to_vec(),
            payload: b"{}".to_vec(),
            signature: Vec::new(),
            correlation_id: None,
        }
    }

    fn pass_everything_battery() -> FilterBattery {
        let mut args = std::collections::HashMap::new();
        args.insert("field".to_string(), "sender".to_string());
        args.insert("regexp".to_string(), ".*".to_string());
        let spec = FilterSpec {
            context: eh_filter::Context::Envelope,
            kind: eh_filter::MatcherKind::Regexp,
            args,
        };
        FilterBattery::new(&[spec]).unwrap()
    }

    /// Records the sender of every invocation, in the order `invoke` was
    /// called.
    struct RecordingAction {
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl RecordingAction {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Vec<u8>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DispatchAction for RecordingAction {
        async fn invoke(&self, envelope: &Envelope) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(envelope.sender.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn admitted_dispatches_happen_in_arrival_order() {
        let (mut coordinator, tx) = coordinator_without_bus(DispatchState::new(
            std::time::Duration::ZERO,
            0,
        ));
        let battery = pass_everything_battery();
        let action = RecordingAction::new();

        for sender in ["a", "b", "c"] {
            tx.send(envelope_with_sender(sender)).await.unwrap();
        }
        drop(tx);

        coordinator.dispatch(&battery, &action).await.unwrap();

        assert_eq!(action.seen(), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(coordinator.dispatches(), 3);
    }

    #[tokio::test]
    async fn no_further_dispatches_occur_after_shutdown() {
        let (mut coordinator, tx) = coordinator_without_bus(DispatchState::new(
            std::time::Duration::ZERO,
            0,
        ));
        let battery = pass_everything_battery();
        let action = RecordingAction::new();

        // Queued before shutdown, but never drained: once shutdown()
        // has returned, the coordinator is `closed` and refuses to
        // dispatch at all, regardless of what is still sitting in the
        // channel.
        tx.send(envelope_with_sender("a")).await.unwrap();
        coordinator.shutdown();

        let result = coordinator.dispatch(&battery, &action).await;

        assert!(matches!(result, Err(DispatchError::InvalidTransition { .. })));
        assert!(action.seen().is_empty());
        assert_eq!(coordinator.dispatches(), 0);
    }

    #[tokio::test]
    async fn done_signal_stops_the_loop_before_a_queued_envelope_is_processed() {
        let (mut coordinator, tx) = coordinator_without_bus(DispatchState::new(
            std::time::Duration::ZERO,
            0,
        ));
        let battery = pass_everything_battery();
        let action = RecordingAction::new();

        tx.send(envelope_with_sender("a")).await.unwrap();
        let _ = coordinator.done_tx.send(true);

        coordinator.dispatch(&battery, &action).await.unwrap();

        assert!(action.seen().is_empty());
        assert_eq!(coordinator.dispatches(), 0);
    }
}
