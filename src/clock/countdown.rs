use serde::{Deserialize, Serialize};

use super::{ClockEvent, ClockHandle};

/// Whole-second countdown bookkeeping shared by the clock implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    handle: ClockHandle,
    limit: u32,
    elapsed: u32,
}

impl Countdown {
    /// A fresh countdown of `limit` seconds.
    #[must_use]
    pub fn new(handle: ClockHandle, limit: u32) -> Self {
        Self {
            handle,
            limit,
            elapsed: 0,
        }
    }

    /// Handle this countdown reports events under.
    #[must_use]
    pub fn handle(&self) -> ClockHandle {
        self.handle
    }

    /// Whole seconds already counted.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.elapsed)
    }

    /// Whether the countdown has reached zero.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.elapsed >= self.limit
    }

    /// Count `seconds` more seconds, appending a tick per second and the
    /// expiry when zero is reached. Seconds past expiry are dropped.
    pub fn count(&mut self, seconds: u64, out: &mut Vec<ClockEvent>) {
        for _ in 0..seconds {
            if self.is_up() {
                return;
            }
            self.elapsed += 1;
            out.push(ClockEvent::Tick {
                handle: self.handle,
                remaining: self.remaining(),
            });
            if self.is_up() {
                out.push(ClockEvent::Expired { handle: self.handle });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_expiry() {
        let handle = ClockHandle(1);
        let mut countdown = Countdown::new(handle, 2);
        let mut events = Vec::new();

        countdown.count(1, &mut events);
        assert_eq!(events, vec![ClockEvent::Tick { handle, remaining: 1 }]);
        assert!(!countdown.is_up());

        countdown.count(1, &mut events);
        assert_eq!(
            &events[1..],
            &[ClockEvent::Tick { handle, remaining: 0 }, ClockEvent::Expired { handle }]
        );
        assert!(countdown.is_up());
    }

    #[test]
    fn test_no_events_after_expiry() {
        let mut countdown = Countdown::new(ClockHandle(1), 1);
        let mut events = Vec::new();

        countdown.count(5, &mut events);
        assert_eq!(events.len(), 2);

        countdown.count(5, &mut events);
        assert_eq!(events.len(), 2);
        assert_eq!(countdown.elapsed(), 1);
        assert_eq!(countdown.remaining(), 0);
    }
}
