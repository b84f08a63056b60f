use std::time::Duration;

use tracing::trace;

use super::{ClockEvent, ClockHandle, Countdown, RoundClock};

/// Clock advanced explicitly by the host.
///
/// Sub-second remainders carry over between `advance` calls, so feeding
/// frame deltas of 16ms produces a tick every 1000ms of accumulated time.
///
/// ```
/// use std::time::Duration;
/// use timed_rounds::clock::{ClockEvent, ManualClock, RoundClock};
///
/// let mut clock = ManualClock::new();
/// let handle = clock.start(2);
/// clock.advance(Duration::from_secs(2));
///
/// assert_eq!(
///     clock.poll(),
///     vec![
///         ClockEvent::Tick { handle, remaining: 1 },
///         ClockEvent::Tick { handle, remaining: 0 },
///         ClockEvent::Expired { handle },
///     ]
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    next_handle: u64,
    active: Option<Countdown>,
    carry: Duration,
    pending: Vec<ClockEvent>,
}

impl ManualClock {
    /// A clock with no active countdown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by exactly one second.
    pub fn tick(&mut self) {
        self.advance(Duration::from_secs(1));
    }
}

impl RoundClock for ManualClock {
    fn start(&mut self, seconds: u32) -> ClockHandle {
        if let Some(active) = self.active {
            self.cancel(active.handle());
        }
        self.pending.clear();
        self.next_handle += 1;
        let handle = ClockHandle(self.next_handle);
        self.active = Some(Countdown::new(handle, seconds));
        self.carry = Duration::ZERO;
        trace!(%handle, seconds, "countdown started");
        handle
    }

    fn cancel(&mut self, handle: ClockHandle) {
        if self.active.is_some_and(|a| a.handle() == handle) {
            self.active = None;
            self.carry = Duration::ZERO;
            trace!(%handle, "countdown cancelled");
        }
        self.pending.retain(|event| event.handle() != handle);
    }

    fn advance(&mut self, elapsed: Duration) {
        let Some(countdown) = self.active.as_mut() else {
            return;
        };
        self.carry += elapsed;
        let whole = self.carry.as_secs();
        self.carry -= Duration::from_secs(whole);

        countdown.count(whole, &mut self.pending);
        if countdown.is_up() {
            self.active = None;
            self.carry = Duration::ZERO;
        }
    }

    fn poll(&mut self) -> Vec<ClockEvent> {
        std::mem::take(&mut self.pending)
    }

    fn remaining(&self) -> Option<u32> {
        self.active.map(|a| a.remaining())
    }
}
