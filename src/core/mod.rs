//! Core engine types: participants, RNG, configuration, errors.
//!
//! These building blocks are puzzle-agnostic. Concrete games configure
//! them via `SessionConfig` rather than modifying the engine.

pub mod config;
pub mod error;
pub mod participant;
pub mod rng;

pub use config::{
    EvaluationMode, PuzzleConfig, PuzzleKind, SessionConfig, TurnPolicy, ALPHABET, MAX_GRID_CELLS,
    MAX_SEQUENCE_LENGTH,
};
pub use error::{ConfigError, EngineError};
pub use participant::{ParticipantId, ParticipantMap, MAX_PARTICIPANTS};
pub use rng::PuzzleRng;
