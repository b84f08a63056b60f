//! Error types.
//!
//! - `ConfigError`: invalid session or puzzle configuration, raised at `start()`.
//! - `EngineError`: any rejected engine operation. Rejections are no-ops:
//!   the engine state is left exactly as it was.

use crate::core::config::PuzzleKind;
use crate::core::participant::ParticipantId;
use crate::session::Lifecycle;

/// Invalid puzzle or session configuration.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum ConfigError {
    /// A grid needs at least one row and one column.
    #[display("grid must be at least 1x1, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    /// Grid rows of differing lengths.
    #[display("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },

    /// Grid cell count overflows or exceeds `MAX_GRID_CELLS`.
    #[display("grid {rows}x{cols} exceeds {max} cells")]
    OversizedGrid { rows: usize, cols: usize, max: usize },

    /// A numeric sequence needs at least one element.
    #[display("sequence length must be at least 1")]
    EmptySequence,

    /// Sequence longer than `MAX_SEQUENCE_LENGTH`.
    #[display("sequence length {length} exceeds {max}")]
    SequenceTooLong { length: usize, max: usize },

    /// Value range lower bound above its upper bound.
    #[display("value range [{min}, {max}] is empty")]
    InvertedRange { min: i32, max: i32 },

    /// Angle bound below zero.
    #[display("angle bound must be non-negative, got {_0}")]
    NegativeAngle(i32),

    /// Alphabet size outside `1..=26`.
    #[display("alphabet size must be in 1..=26, got {_0}")]
    AlphabetSize(usize),

    /// Too few symbols to shuffle into a non-sorted order.
    #[display("ordering puzzles need at least 2 symbols, got {_0}")]
    TooFewSymbols(usize),

    /// More distinct symbols requested than the alphabet holds.
    #[display("cannot draw {requested} distinct symbols from an alphabet of {alphabet}")]
    TooManySymbols { requested: usize, alphabet: usize },

    /// Participant count outside `1..=255`.
    #[display("participant count must be in 1..=255, got {_0}")]
    ParticipantCount(usize),

    /// A session needs at least one round.
    #[display("round budget must be at least 1")]
    ZeroRounds,

    /// A round needs at least one second on the clock.
    #[display("round duration must be at least 1 second")]
    ZeroDuration,

    /// A scripted puzzle list was empty or held a puzzle of the wrong kind.
    #[display("scripted puzzle does not match kind {expected}")]
    ScriptMismatch { expected: PuzzleKind },
}

impl std::error::Error for ConfigError {}

/// A rejected engine operation.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// Configuration was rejected at `start()`.
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),

    /// The operation is not valid in the current lifecycle state.
    #[display("{operation} is not valid while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: Lifecycle,
    },

    /// The participant exists but is not answering this round.
    #[display("it is not {participant}'s turn")]
    NotYourTurn { participant: ParticipantId },

    /// The participant is not part of the session.
    #[display("{participant} is not in this session")]
    UnknownParticipant { participant: ParticipantId },

    /// The puzzle has no answer slot at this position.
    #[display("position {position} is outside the puzzle's {slots} answer slots")]
    PositionOutOfRange { position: usize, slots: usize },

    /// An ordering slot already holds a symbol.
    #[display("slot {position} is already filled")]
    SlotOccupied { position: usize },

    /// The symbol is not part of the puzzle or has already been placed.
    #[display("symbol {symbol:?} is not available")]
    SymbolUnavailable { symbol: String },
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EmptyGrid { rows: 0, cols: 4 };
        assert_eq!(err.to_string(), "grid must be at least 1x1, got 0x4");

        let err = ConfigError::TooManySymbols { requested: 30, alphabet: 26 };
        assert_eq!(err.to_string(), "cannot draw 30 distinct symbols from an alphabet of 26");
    }

    #[test]
    fn test_engine_error_wraps_config() {
        let err: EngineError = ConfigError::ZeroRounds.into();

        assert_eq!(err.to_string(), "invalid configuration: round budget must be at least 1");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = EngineError::InvalidTransition {
            operation: "submit_answer",
            state: Lifecycle::Idle,
        };
        assert_eq!(err.to_string(), "submit_answer is not valid while idle");
        assert!(err.source().is_none());
    }
}
