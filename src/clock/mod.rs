//! Round countdowns.
//!
//! The engine never reads wall-clock time itself. It owns a `RoundClock`
//! and asks it for `ClockEvent`s; how time passes is the clock's business:
//!
//! - [`ManualClock`]: the host feeds elapsed time (`advance`), e.g. from a
//!   frame loop or a test.
//! - [`SystemClock`]: reads `std::time::Instant` whenever it is polled.
//!
//! Every countdown is identified by a [`ClockHandle`]. Starting a new
//! countdown cancels the previous one, so at most one is active, and
//! events carry their handle so a stale expiry can always be told apart
//! from the current round's.

mod countdown;
mod manual;
mod system;

pub use countdown::Countdown;
pub use manual::ManualClock;
pub use system::SystemClock;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies one started countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockHandle(pub u64);

impl std::fmt::Display for ClockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Clock({})", self.0)
    }
}

/// Signal produced by a running countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// One second passed; `remaining` seconds are left.
    Tick { handle: ClockHandle, remaining: u32 },
    /// The countdown reached zero. Sent exactly once per handle.
    Expired { handle: ClockHandle },
}

impl ClockEvent {
    /// Countdown this event belongs to.
    #[must_use]
    pub fn handle(&self) -> ClockHandle {
        match self {
            ClockEvent::Tick { handle, .. } | ClockEvent::Expired { handle } => *handle,
        }
    }
}

/// Countdown scheduler driven by the hosting event loop.
///
/// Contract:
/// - `start(d)` yields exactly `d` ticks (remaining `d-1` down to `0`)
///   followed by exactly one `Expired`.
/// - `start` cancels any active countdown first and drops undelivered
///   events of earlier ones.
/// - `cancel` is idempotent and drops undelivered events for that handle.
pub trait RoundClock {
    /// Start a countdown of `seconds` whole seconds.
    fn start(&mut self, seconds: u32) -> ClockHandle;

    /// Stop a countdown. Unknown or finished handles are ignored.
    fn cancel(&mut self, handle: ClockHandle);

    /// Feed elapsed wall time. Clocks that read a time source themselves
    /// ignore it.
    fn advance(&mut self, _elapsed: Duration) {}

    /// Take every event produced since the last poll, oldest first.
    fn poll(&mut self) -> Vec<ClockEvent>;

    /// Seconds left on the active countdown, if any.
    fn remaining(&self) -> Option<u32>;
}
