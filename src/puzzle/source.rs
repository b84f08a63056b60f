//! Puzzle sources: the per-game strategy the engine asks for each round.

use crate::core::{ConfigError, PuzzleConfig, PuzzleRng};

use super::generator::generate_validated;
use super::Puzzle;

/// Supplies the puzzle for each round.
///
/// The engine validates the session config, calls [`check`] once at
/// `start()`, then [`next_puzzle`] at the start of every round. A source
/// must not fail after `check` succeeded.
///
/// [`check`]: PuzzleSource::check
/// [`next_puzzle`]: PuzzleSource::next_puzzle
pub trait PuzzleSource {
    /// Extra validation against the session's puzzle config.
    fn check(&self, _config: &PuzzleConfig) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Reset any per-session progress. Called at every `start()`.
    fn rewind(&mut self) {}

    /// Produce the next round's puzzle.
    fn next_puzzle(&mut self, config: &PuzzleConfig, rng: &mut PuzzleRng) -> Puzzle;
}

/// Draws every puzzle uniformly at random per the config.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPuzzles;

impl PuzzleSource for RandomPuzzles {
    fn next_puzzle(&mut self, config: &PuzzleConfig, rng: &mut PuzzleRng) -> Puzzle {
        generate_validated(config, rng)
    }
}

/// Replays a fixed list of puzzles in order, cycling when exhausted.
///
/// ```
/// use timed_rounds::core::{PuzzleConfig, PuzzleKind, PuzzleRng};
/// use timed_rounds::puzzle::{FixedPuzzles, Puzzle, PuzzleSource};
///
/// let mut source = FixedPuzzles::new(vec![Puzzle::angle(90), Puzzle::angle(45)]);
/// let config = PuzzleConfig::for_kind(PuzzleKind::AngleEstimate);
/// let mut rng = PuzzleRng::new(0);
///
/// assert_eq!(source.next_puzzle(&config, &mut rng), Puzzle::angle(90));
/// assert_eq!(source.next_puzzle(&config, &mut rng), Puzzle::angle(45));
/// assert_eq!(source.next_puzzle(&config, &mut rng), Puzzle::angle(90));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FixedPuzzles {
    puzzles: Vec<Puzzle>,
    next: usize,
}

impl FixedPuzzles {
    /// Script the given puzzles.
    #[must_use]
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        Self { puzzles, next: 0 }
    }

    /// Number of scripted puzzles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Whether the script is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

impl PuzzleSource for FixedPuzzles {
    fn check(&self, config: &PuzzleConfig) -> Result<(), ConfigError> {
        if self.puzzles.is_empty() || self.puzzles.iter().any(|p| p.kind() != config.kind) {
            return Err(ConfigError::ScriptMismatch { expected: config.kind });
        }
        Ok(())
    }

    fn rewind(&mut self) {
        self.next = 0;
    }

    fn next_puzzle(&mut self, config: &PuzzleConfig, rng: &mut PuzzleRng) -> Puzzle {
        // The engine never gets here with an empty script (`check` rejects
        // it); direct callers fall back to a generated puzzle.
        if self.puzzles.is_empty() {
            return generate_validated(config, rng);
        }
        let puzzle = self.puzzles[self.next % self.puzzles.len()].clone();
        self.next += 1;
        puzzle
    }
}
