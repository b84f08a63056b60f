//! Game sessions and the round state machine.
//!
//! ## RoundEngine
//!
//! The only component a host talks to. It drives:
//! - lifecycle transitions (`idle → playing → evaluating → playing | finished`)
//! - puzzle draws from its `PuzzleSource`
//! - the `RoundClock` countdown, one handle at a time
//! - evaluation and score folding when a round closes
//!
//! ## GameSession
//!
//! The aggregate a `start()` creates: round counter, turn, scores, the
//! open round's puzzle and answers, closed-round history and the winner.
//!
//! ## Notifications
//!
//! Hosts `subscribe` to `SessionEvent`s and re-derive their view after
//! each one instead of sharing mutable state with the engine.

mod answers;
mod engine;
mod events;
mod state;

pub use answers::AnswerStore;
pub use engine::RoundEngine;
pub use events::SessionEvent;
pub use state::{GameSession, Lifecycle, RoundRecord};
