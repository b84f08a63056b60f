use std::time::Instant;

use tracing::trace;

use super::{ClockEvent, ClockHandle, Countdown, RoundClock};

/// Clock backed by the monotonic system clock.
///
/// Time is read on `poll`; a host polls it from its event loop as often as
/// it likes and receives one tick per whole second since `start`, even if
/// several seconds passed between polls.
#[derive(Clone, Debug, Default)]
pub struct SystemClock {
    next_handle: u64,
    active: Option<(Countdown, Instant)>,
    pending: Vec<ClockEvent>,
}

impl SystemClock {
    /// A clock with no active countdown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoundClock for SystemClock {
    fn start(&mut self, seconds: u32) -> ClockHandle {
        if let Some((active, _)) = self.active {
            self.cancel(active.handle());
        }
        self.pending.clear();
        self.next_handle += 1;
        let handle = ClockHandle(self.next_handle);
        self.active = Some((Countdown::new(handle, seconds), Instant::now()));
        trace!(%handle, seconds, "countdown started");
        handle
    }

    fn cancel(&mut self, handle: ClockHandle) {
        if self.active.is_some_and(|(a, _)| a.handle() == handle) {
            self.active = None;
            trace!(%handle, "countdown cancelled");
        }
        self.pending.retain(|event| event.handle() != handle);
    }

    fn poll(&mut self) -> Vec<ClockEvent> {
        if let Some((countdown, started)) = self.active.as_mut() {
            let due = started
                .elapsed()
                .as_secs()
                .saturating_sub(u64::from(countdown.elapsed()));
            countdown.count(due, &mut self.pending);
            if countdown.is_up() {
                self.active = None;
            }
        }
        std::mem::take(&mut self.pending)
    }

    fn remaining(&self) -> Option<u32> {
        self.active.map(|(a, _)| a.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_countdown_has_no_events() {
        let mut clock = SystemClock::new();
        let _ = clock.start(30);

        assert!(clock.poll().is_empty());
        assert_eq!(clock.remaining(), Some(30));
    }

    #[test]
    fn test_cancel_clears_active() {
        let mut clock = SystemClock::new();
        let handle = clock.start(30);

        clock.cancel(handle);
        clock.cancel(handle);

        assert_eq!(clock.remaining(), None);
        assert!(clock.poll().is_empty());
    }

    #[test]
    fn test_restart_issues_new_handle() {
        let mut clock = SystemClock::new();
        let first = clock.start(30);
        let second = clock.start(30);

        assert_ne!(first, second);
        assert_eq!(clock.remaining(), Some(30));
    }
}
