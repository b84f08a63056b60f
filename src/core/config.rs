//! Session and puzzle configuration.
//!
//! Hosts configure the engine at `start()` by providing:
//! - `PuzzleConfig`: which puzzle kind to generate and its size/range knobs
//! - `SessionConfig`: participants, round budget, clock duration, turn policy
//!
//! The engine never hardcodes durations or sizes. The defaults returned by
//! `PuzzleConfig::for_kind` match the observed games, and the `games`
//! module bundles complete presets.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::participant::MAX_PARTICIPANTS;

/// Full alphabet used by ordering puzzles.
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Largest grid a valley puzzle may request.
pub const MAX_GRID_CELLS: usize = 4096;

/// Longest sequence a taller-neighbors puzzle may request.
pub const MAX_SEQUENCE_LENGTH: usize = 4096;

/// Puzzle kind. Selects both the generator and the evaluation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum PuzzleKind {
    /// Estimate a single angle (duel game).
    #[display("angle estimate")]
    AngleEstimate,
    /// Count each bar's strictly taller immediate neighbors.
    #[display("taller neighbors")]
    TallerNeighbors,
    /// Select every grid cell smaller than all of its neighbors.
    #[display("number valley")]
    NumberValley,
    /// Arrange shuffled symbols in ascending order.
    #[display("alphabet order")]
    AlphabetOrder,
    /// Fill in the truth table of a boolean expression.
    #[display("truth table")]
    TruthTable,
}

impl PuzzleKind {
    /// All kinds, in declaration order.
    pub const ALL: [PuzzleKind; 5] = [
        PuzzleKind::AngleEstimate,
        PuzzleKind::TallerNeighbors,
        PuzzleKind::NumberValley,
        PuzzleKind::AlphabetOrder,
        PuzzleKind::TruthTable,
    ];

    /// How answers to this kind are evaluated.
    #[must_use]
    pub const fn evaluation_mode(self) -> EvaluationMode {
        match self {
            PuzzleKind::AngleEstimate => EvaluationMode::Difference,
            PuzzleKind::AlphabetOrder => EvaluationMode::Outcome,
            PuzzleKind::TallerNeighbors | PuzzleKind::NumberValley | PuzzleKind::TruthTable => {
                EvaluationMode::Classification
            }
        }
    }
}

/// Evaluation mode selected by puzzle kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Numeric error `|guess - truth|`, lower is better.
    Difference,
    /// Per-position correct/incorrect/missed.
    Classification,
    /// Whole-answer win or lose.
    Outcome,
}

/// Who answers in a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPolicy {
    /// One participant answers per round, rotating in id order.
    #[default]
    RoundRobin,
    /// Every participant answers the same puzzle each round.
    Simultaneous,
}

/// Puzzle generation parameters.
///
/// Only the fields relevant to `kind` are read; the rest keep their
/// defaults and are ignored by validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Which puzzle to generate.
    pub kind: PuzzleKind,

    /// Upper bound of the angle range `[0, max_angle]`.
    pub max_angle: i32,

    /// Number of bars in a taller-neighbors sequence.
    pub sequence_length: usize,

    /// Grid rows for valley puzzles.
    pub grid_rows: usize,

    /// Grid columns for valley puzzles.
    pub grid_cols: usize,

    /// Smallest value drawn for sequences and grids.
    pub min_value: i32,

    /// Largest value drawn for sequences and grids.
    pub max_value: i32,

    /// Number of distinct symbols in an ordering puzzle.
    pub symbol_count: usize,

    /// Size of the alphabet prefix symbols are drawn from (`A..`).
    pub alphabet_size: usize,
}

impl PuzzleConfig {
    /// Configuration with the observed defaults for `kind`.
    #[must_use]
    pub fn for_kind(kind: PuzzleKind) -> Self {
        Self {
            kind,
            max_angle: 180,
            sequence_length: 6,
            grid_rows: 4,
            grid_cols: 4,
            min_value: 1,
            max_value: 10,
            symbol_count: 5,
            alphabet_size: ALPHABET.len(),
        }
    }

    /// Set the angle range upper bound.
    #[must_use]
    pub fn with_max_angle(mut self, max_angle: i32) -> Self {
        self.max_angle = max_angle;
        self
    }

    /// Set the sequence length.
    #[must_use]
    pub fn with_sequence_length(mut self, length: usize) -> Self {
        self.sequence_length = length;
        self
    }

    /// Set the grid dimensions.
    #[must_use]
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid_rows = rows;
        self.grid_cols = cols;
        self
    }

    /// Set the inclusive value range.
    #[must_use]
    pub fn with_value_range(mut self, range: RangeInclusive<i32>) -> Self {
        self.min_value = *range.start();
        self.max_value = *range.end();
        self
    }

    /// Set how many symbols an ordering puzzle uses.
    #[must_use]
    pub fn with_symbol_count(mut self, count: usize) -> Self {
        self.symbol_count = count;
        self
    }

    /// Set the alphabet size.
    #[must_use]
    pub fn with_alphabet_size(mut self, size: usize) -> Self {
        self.alphabet_size = size;
        self
    }

    /// Inclusive value range for sequences and grids.
    #[must_use]
    pub fn value_range(&self) -> RangeInclusive<i32> {
        self.min_value..=self.max_value
    }

    /// The symbols an ordering puzzle may draw from.
    #[must_use]
    pub fn alphabet(&self) -> &'static [char] {
        &ALPHABET[..self.alphabet_size.min(ALPHABET.len())]
    }

    /// Check the fields read by this kind's generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            PuzzleKind::AngleEstimate => {
                if self.max_angle < 0 {
                    return Err(ConfigError::NegativeAngle(self.max_angle));
                }
            }
            PuzzleKind::TallerNeighbors => {
                if self.sequence_length == 0 {
                    return Err(ConfigError::EmptySequence);
                }
                if self.sequence_length > MAX_SEQUENCE_LENGTH {
                    return Err(ConfigError::SequenceTooLong {
                        length: self.sequence_length,
                        max: MAX_SEQUENCE_LENGTH,
                    });
                }
                self.validate_value_range()?;
            }
            PuzzleKind::NumberValley => {
                if self.grid_rows == 0 || self.grid_cols == 0 {
                    return Err(ConfigError::EmptyGrid {
                        rows: self.grid_rows,
                        cols: self.grid_cols,
                    });
                }
                match self.grid_rows.checked_mul(self.grid_cols) {
                    Some(cells) if cells <= MAX_GRID_CELLS => {}
                    _ => {
                        return Err(ConfigError::OversizedGrid {
                            rows: self.grid_rows,
                            cols: self.grid_cols,
                            max: MAX_GRID_CELLS,
                        })
                    }
                }
                self.validate_value_range()?;
            }
            PuzzleKind::AlphabetOrder => {
                if self.alphabet_size == 0 || self.alphabet_size > ALPHABET.len() {
                    return Err(ConfigError::AlphabetSize(self.alphabet_size));
                }
                if self.symbol_count < 2 {
                    return Err(ConfigError::TooFewSymbols(self.symbol_count));
                }
                if self.symbol_count > self.alphabet_size {
                    return Err(ConfigError::TooManySymbols {
                        requested: self.symbol_count,
                        alphabet: self.alphabet_size,
                    });
                }
            }
            PuzzleKind::TruthTable => {}
        }
        Ok(())
    }

    fn validate_value_range(&self) -> Result<(), ConfigError> {
        if self.min_value > self.max_value {
            return Err(ConfigError::InvertedRange {
                min: self.min_value,
                max: self.max_value,
            });
        }
        Ok(())
    }
}

/// Complete session configuration, passed to `start()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Puzzle generated for every round.
    pub puzzle: PuzzleConfig,

    /// Number of participants (1-255).
    pub participant_count: usize,

    /// Rounds per session.
    pub round_budget: u32,

    /// Countdown length of each round, in seconds.
    pub round_seconds: u32,

    /// Who answers each round.
    pub turn_policy: TurnPolicy,

    /// RNG seed. `None` draws one from entropy at `start()`.
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Single participant, single round, 30 second clock.
    #[must_use]
    pub fn new(puzzle: PuzzleConfig) -> Self {
        Self {
            puzzle,
            participant_count: 1,
            round_budget: 1,
            round_seconds: 30,
            turn_policy: TurnPolicy::RoundRobin,
            seed: None,
        }
    }

    /// Set the participant count.
    #[must_use]
    pub fn with_participants(mut self, count: usize) -> Self {
        self.participant_count = count;
        self
    }

    /// Set the round budget.
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.round_budget = rounds;
        self
    }

    /// Set the per-round countdown.
    #[must_use]
    pub fn with_round_seconds(mut self, seconds: u32) -> Self {
        self.round_seconds = seconds;
        self
    }

    /// Set the turn policy.
    #[must_use]
    pub fn with_turn_policy(mut self, policy: TurnPolicy) -> Self {
        self.turn_policy = policy;
        self
    }

    /// Fix the RNG seed for reproducible puzzles.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Puzzle kind shorthand.
    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        self.puzzle.kind
    }

    /// Check the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.participant_count == 0 || self.participant_count > MAX_PARTICIPANTS {
            return Err(ConfigError::ParticipantCount(self.participant_count));
        }
        if self.round_budget == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.round_seconds == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        self.puzzle.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        for kind in PuzzleKind::ALL {
            assert_eq!(PuzzleConfig::for_kind(kind).validate(), Ok(()), "{kind}");
        }
    }

    #[test]
    fn test_evaluation_modes() {
        assert_eq!(PuzzleKind::AngleEstimate.evaluation_mode(), EvaluationMode::Difference);
        assert_eq!(PuzzleKind::AlphabetOrder.evaluation_mode(), EvaluationMode::Outcome);
        assert_eq!(PuzzleKind::NumberValley.evaluation_mode(), EvaluationMode::Classification);
        assert_eq!(PuzzleKind::TruthTable.evaluation_mode(), EvaluationMode::Classification);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let config = PuzzleConfig::for_kind(PuzzleKind::NumberValley).with_grid(0, 4);
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid { rows: 0, cols: 4 }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config =
            PuzzleConfig::for_kind(PuzzleKind::TallerNeighbors).with_value_range(10..=1);
        assert_eq!(config.validate(), Err(ConfigError::InvertedRange { min: 10, max: 1 }));
    }

    #[test]
    fn test_symbol_limits() {
        let base = PuzzleConfig::for_kind(PuzzleKind::AlphabetOrder);

        assert_eq!(
            base.clone().with_symbol_count(1).validate(),
            Err(ConfigError::TooFewSymbols(1))
        );
        assert_eq!(
            base.clone().with_alphabet_size(4).validate(),
            Err(ConfigError::TooManySymbols { requested: 5, alphabet: 4 })
        );
        assert_eq!(
            base.clone().with_alphabet_size(27).validate(),
            Err(ConfigError::AlphabetSize(27))
        );
        assert_eq!(base.with_symbol_count(26).validate(), Ok(()));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let base = PuzzleConfig::for_kind(PuzzleKind::NumberValley);

        assert_eq!(
            base.clone().with_grid(usize::MAX / 2 + 1, 2).validate(),
            Err(ConfigError::OversizedGrid {
                rows: usize::MAX / 2 + 1,
                cols: 2,
                max: MAX_GRID_CELLS,
            })
        );
        assert!(matches!(
            base.clone().with_grid(MAX_GRID_CELLS, 2).validate(),
            Err(ConfigError::OversizedGrid { .. })
        ));
        assert_eq!(base.with_grid(64, 64).validate(), Ok(()));
    }

    #[test]
    fn test_long_sequence_rejected() {
        let base = PuzzleConfig::for_kind(PuzzleKind::TallerNeighbors);

        assert_eq!(
            base.clone().with_sequence_length(MAX_SEQUENCE_LENGTH + 1).validate(),
            Err(ConfigError::SequenceTooLong {
                length: MAX_SEQUENCE_LENGTH + 1,
                max: MAX_SEQUENCE_LENGTH,
            })
        );
        assert_eq!(base.with_sequence_length(MAX_SEQUENCE_LENGTH).validate(), Ok(()));
    }

    #[test]
    fn test_irrelevant_fields_ignored() {
        let config = PuzzleConfig::for_kind(PuzzleKind::AngleEstimate).with_grid(0, 0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_session_validation() {
        let puzzle = PuzzleConfig::for_kind(PuzzleKind::AngleEstimate);

        assert_eq!(
            SessionConfig::new(puzzle.clone()).with_participants(0).validate(),
            Err(ConfigError::ParticipantCount(0))
        );
        assert_eq!(
            SessionConfig::new(puzzle.clone()).with_rounds(0).validate(),
            Err(ConfigError::ZeroRounds)
        );
        assert_eq!(
            SessionConfig::new(puzzle.clone()).with_round_seconds(0).validate(),
            Err(ConfigError::ZeroDuration)
        );
        assert_eq!(SessionConfig::new(puzzle).validate(), Ok(()));
    }

    #[test]
    fn test_alphabet_prefix() {
        let config = PuzzleConfig::for_kind(PuzzleKind::AlphabetOrder).with_alphabet_size(3);
        assert_eq!(config.alphabet(), &['A', 'B', 'C']);
    }

    #[test]
    fn test_session_config_serde() {
        let config = SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::NumberValley))
            .with_round_seconds(20)
            .with_seed(7);

        let json = serde_json::to_string(&config).unwrap();
        let restored: SessionConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
