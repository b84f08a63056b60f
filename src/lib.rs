//! # timed-rounds
//!
//! A timed round evaluation engine for small puzzle and duel games.
//!
//! Every game built on it follows the same cycle: draw a puzzle with its
//! ground truth, collect answers while a countdown runs, evaluate the
//! answers when the clock expires (or the round is closed early), fold the
//! result into cumulative scores, then open the next round or finish.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: The engine knows puzzle *kinds*, not screens.
//!    Rendering and input widgets belong to the host.
//!
//! 2. **Injected Time**: The engine never reads a clock. A `RoundClock`
//!    produces ticks and expiries; hosts advance it from their event loop
//!    and tests advance it by hand.
//!
//! 3. **Configuration Over Convention**: Durations, sizes, ranges and
//!    round budgets all come from `SessionConfig`.
//!
//! 4. **Forgiving Input**: Answers arrive as raw text, numbers or flags
//!    and are parsed leniently at evaluation time. Evaluation never fails.
//!
//! ## Modules
//!
//! - `core`: Participants, RNG, configuration, errors
//! - `puzzle`: Puzzles, ground truth, generation, puzzle sources
//! - `clock`: Round countdowns
//! - `eval`: Answer parsing and evaluation
//! - `score`: Score folding and winner resolution
//! - `session`: The round state machine and session state
//! - `games`: Presets for the five games

pub mod clock;
pub mod core;
pub mod eval;
pub mod games;
pub mod puzzle;
pub mod score;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, EngineError, EvaluationMode, ParticipantId, ParticipantMap, PuzzleConfig,
    PuzzleKind, PuzzleRng, SessionConfig, TurnPolicy,
};

pub use crate::puzzle::{
    FixedPuzzles, GroundTruth, Puzzle, PuzzlePayload, PuzzleSource, PuzzleView, RandomPuzzles,
};

pub use crate::clock::{ClockEvent, ClockHandle, ManualClock, RoundClock, SystemClock};

pub use crate::eval::{
    evaluate, resolve_outcome, AnswerSheet, Evaluation, RawInput, RoundOutcome, Tally, Verdict,
};

pub use crate::score::{fold, resolve_winner, Scoreboard};

pub use crate::session::{
    AnswerStore, GameSession, Lifecycle, RoundEngine, RoundRecord, SessionEvent,
};
