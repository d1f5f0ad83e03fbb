//! Blackout window and lifetime dispatch cap (spec §3 `DispatchState`, §4.7).

use std::time::{Duration, Instant};

/// Outcome of an admission check. `now`/`lastDispatched` bookkeeping is
/// applied by the caller only on [`Admission::Admit`], after the
/// runner invocation for that envelope has returned (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    RejectedBlackout,
    RejectedCap,
}

/// Mutated only by the dispatch task (spec §9 "coordinator state");
/// no internal locking.
pub struct DispatchState {
    last_dispatched: Option<Instant>,
    dispatches: u64,
    max_dispatches: u64,
    blackout: Duration,
}

impl DispatchState {
    pub fn new(blackout: Duration, max_dispatches: u64) -> Self {
        Self {
            last_dispatched: None,
            dispatches: 0,
            max_dispatches,
            blackout,
        }
    }

    /// Evaluate the admission cascade at `now`, first hit decides:
    /// blackout, then cap, then admit.
    pub fn check(&self, now: Instant) -> Admission {
        if let Some(last) = self.last_dispatched {
            if now < last + self.blackout {
                return Admission::RejectedBlackout;
            }
        }
        if self.max_dispatches == 0 {
            return Admission::Admit;
        }
        if self.dispatches >= self.max_dispatches {
            return Admission::RejectedCap;
        }
        Admission::Admit
    }

    /// Record an admitted dispatch that has just completed (spec
    /// §4.7: counters update after the runner invocation returns,
    /// not before it starts).
    pub fn record_dispatch(&mut self, now: Instant) {
        self.last_dispatched = Some(now);
        self.dispatches += 1;
    }

    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_dispatch_is_always_admitted() {
        let state = DispatchState::new(Duration::from_millis(200), 0);
        assert_eq!(state.check(Instant::now()), Admission::Admit);
    }

    #[test]
    fn blackout_rejects_dispatch_inside_window() {
        let mut state = DispatchState::new(Duration::from_millis(200), 0);
        let t0 = Instant::now();
        state.record_dispatch(t0);
        assert_eq!(
            state.check(t0 + Duration::from_millis(100)),
            Admission::RejectedBlackout
        );
        assert_eq!(
            state.check(t0 + Duration::from_millis(300)),
            Admission::Admit
        );
    }

    #[test]
    fn zero_cap_means_unlimited() {
        let mut state = DispatchState::new(Duration::from_millis(0), 0);
        let t0 = Instant::now();
        for i in 0..10 {
            let now = t0 + Duration::from_millis(i);
            assert_eq!(state.check(now), Admission::Admit);
            state.record_dispatch(now);
        }
    }

    #[test]
    fn cap_rejects_once_reached() {
        let mut state = DispatchState::new(Duration::from_millis(0), 2);
        let t0 = Instant::now();
        assert_eq!(state.check(t0), Admission::Admit);
        state.record_dispatch(t0);
        let t1 = t0 + Duration::from_millis(1);
        assert_eq!(state.check(t1), Admission::Admit);
        state.record_dispatch(t1);
        let t2 = t0 + Duration::from_millis(2);
        assert_eq!(state.check(t2), Admission::RejectedCap);
    }

    #[test]
    fn blackout_cascade_outranks_cap_cascade() {
        let mut state = DispatchState::new(Duration::from_millis(200), 5);
        let t0 = Instant::now();
        state.record_dispatch(t0);
        assert_eq!(
            state.check(t0 + Duration::from_millis(50)),
            Admission::RejectedBlackout
        );
    }
}
