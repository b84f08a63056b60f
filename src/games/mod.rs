//! Ready-made configurations for the five games.
//!
//! Each preset is a plain `SessionConfig`; chain `with_*` calls to adjust
//! it before passing it to `RoundEngine::start`.
//!
//! | game            | participants | rounds | seconds | turns       |
//! |-----------------|--------------|--------|---------|-------------|
//! | angle duel      | 2            | 6      | 15      | round-robin |
//! | taller neighbors| 1            | 1      | 30      | round-robin |
//! | number valley   | 1            | 1      | 20      | round-robin |
//! | alphabet order  | 1            | 1      | 30      | round-robin |
//! | truth table     | 1            | 1      | 30      | round-robin |

use crate::core::{PuzzleConfig, PuzzleKind, SessionConfig, TurnPolicy};

/// Two players alternate estimating angles for six rounds; lowest total
/// error wins.
#[must_use]
pub fn angle_duel() -> SessionConfig {
    SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::AngleEstimate))
        .with_participants(2)
        .with_rounds(6)
        .with_round_seconds(15)
        .with_turn_policy(TurnPolicy::RoundRobin)
}

#[must_use]
pub fn taller_neighbors() -> SessionConfig {
    SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::TallerNeighbors))
}

#[must_use]
pub fn number_valley() -> SessionConfig {
    SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::NumberValley)).with_round_seconds(20)
}

#[must_use]
pub fn alphabet_order() -> SessionConfig {
    SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::AlphabetOrder))
}

#[must_use]
pub fn truth_table() -> SessionConfig {
    SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::TruthTable))
}

/// Preset for a puzzle kind.
#[must_use]
pub fn preset(kind: PuzzleKind) -> SessionConfig {
    match kind {
        PuzzleKind::AngleEstimate => angle_duel(),
        PuzzleKind::TallerNeighbors => taller_neighbors(),
        PuzzleKind::NumberValley => number_valley(),
        PuzzleKind::AlphabetOrder => alphabet_order(),
        PuzzleKind::TruthTable => truth_table(),
    }
}
