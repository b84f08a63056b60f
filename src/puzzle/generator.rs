//! Uniform puzzle generation.
//!
//! Every generator is a pure function of the RNG stream and the config:
//! same seed, same puzzles.

use tracing::trace;

use crate::core::{ConfigError, PuzzleConfig, PuzzleKind, PuzzleRng};

use super::grid::Grid;
use super::logic::{Operator, Shape};
use super::Puzzle;

/// Generate one puzzle after validating `config`.
///
/// ```
/// use timed_rounds::core::{PuzzleConfig, PuzzleKind, PuzzleRng};
/// use timed_rounds::puzzle::generate;
///
/// let mut rng = PuzzleRng::new(1);
/// let puzzle = generate(&PuzzleConfig::for_kind(PuzzleKind::TruthTable), &mut rng).unwrap();
/// assert_eq!(puzzle.answer_slots(), 16);
/// ```
pub fn generate(config: &PuzzleConfig, rng: &mut PuzzleRng) -> Result<Puzzle, ConfigError> {
    config.validate()?;
    Ok(generate_validated(config, rng))
}

/// Generate one puzzle from an already validated config.
pub(crate) fn generate_validated(config: &PuzzleConfig, rng: &mut PuzzleRng) -> Puzzle {
    match config.kind {
        PuzzleKind::AngleEstimate => Puzzle::angle(rng.gen_range_inclusive(0..=config.max_angle)),
        PuzzleKind::TallerNeighbors => {
            let heights = (0..config.sequence_length)
                .map(|_| rng.gen_range_inclusive(config.value_range()))
                .collect();
            Puzzle::taller_neighbors(heights)
        }
        PuzzleKind::NumberValley => {
            let cells = (0..config.grid_rows * config.grid_cols)
                .map(|_| rng.gen_range_inclusive(config.value_range()))
                .collect();
            Puzzle::number_valley(Grid::from_cells(config.grid_rows, config.grid_cols, cells))
        }
        PuzzleKind::AlphabetOrder => {
            let mut symbols = draw_distinct(config.alphabet(), config.symbol_count, rng);
            shuffle_out_of_order(&mut symbols, rng);
            Puzzle::alphabet_order(symbols)
        }
        PuzzleKind::TruthTable => {
            let shape = Shape::ALL[rng.gen_index(Shape::ALL.len())];
            let ops = [(); 3].map(|()| {
                if rng.gen_bool(0.5) {
                    Operator::And
                } else {
                    Operator::Or
                }
            });
            Puzzle::truth_table(shape, ops)
        }
    }
}

/// Draw `count` distinct symbols by rejection: repeats are discarded and
/// redrawn. Requires `count <= alphabet.len()`.
fn draw_distinct(alphabet: &[char], count: usize, rng: &mut PuzzleRng) -> Vec<char> {
    let mut picked = Vec::with_capacity(count);
    let mut rejected = 0usize;

    while picked.len() < count.min(alphabet.len()) {
        let Some(&symbol) = rng.choose(alphabet) else {
            break;
        };
        if picked.contains(&symbol) {
            rejected += 1;
            continue;
        }
        picked.push(symbol);
    }

    trace!(count, rejected, "drew distinct symbols");
    picked
}

/// Shuffle until the order differs from ascending. Needs at least two
/// distinct symbols, otherwise every order is sorted.
fn shuffle_out_of_order(symbols: &mut [char], rng: &mut PuzzleRng) {
    if symbols.len() < 2 {
        return;
    }
    loop {
        rng.shuffle(symbols);
        if symbols.windows(2).any(|w| w[0] > w[1]) {
            return;
        }
        trace!("shuffle left symbols sorted, reshuffling");
    }
}
