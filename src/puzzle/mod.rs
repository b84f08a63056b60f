//! Puzzles and their ground truth.
//!
//! A `Puzzle` pairs what the participant sees (`PuzzlePayload`) with the
//! answer it is judged against (`GroundTruth`). The truth is computed once,
//! in the constructor, and can never be changed afterwards.
//!
//! Puzzles come from a [`PuzzleSource`]: [`RandomPuzzles`] draws them
//! uniformly per [`PuzzleConfig`], [`FixedPuzzles`] replays a script.
//!
//! [`PuzzleConfig`]: crate::core::PuzzleConfig

mod generator;
mod grid;
mod logic;
mod source;

pub use generator::generate;
pub use grid::{taller_neighbor_counts, Grid};
pub use logic::{
    Assignment, Expr, Operator, ParseError, Shape, Variable, MAX_NESTING, MAX_OPERATORS, ROW_COUNT,
};
pub use source::{FixedPuzzles, PuzzleSource, RandomPuzzles};

use serde::{Deserialize, Serialize};

use crate::core::PuzzleKind;

/// What the participant is shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzlePayload {
    /// A wedge of the given angle, in degrees.
    Angle { degrees: i32 },
    /// Bar heights, left to right.
    Bars { heights: Vec<i32> },
    /// A number grid.
    Grid(Grid),
    /// Symbols in presentation (shuffled) order.
    Symbols { presentation: Vec<char> },
    /// A boolean expression over `A..D`.
    Expression { shape: Shape, expr: Expr },
}

/// The correct answer a puzzle is judged against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundTruth {
    /// A single target value.
    Scalar(i64),
    /// Per-position taller-neighbor counts.
    Counts(Vec<u8>),
    /// Per-cell valley flags, row-major.
    Cells(Vec<bool>),
    /// The canonical (ascending) symbol order.
    Sequence(Vec<char>),
    /// Expected result for each truth-table row.
    Table(Vec<bool>),
}

/// A generated puzzle. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    payload: PuzzlePayload,
    truth: GroundTruth,
}

impl Puzzle {
    /// Angle estimation puzzle; the truth is the angle itself.
    #[must_use]
    pub fn angle(degrees: i32) -> Self {
        Self {
            payload: PuzzlePayload::Angle { degrees },
            truth: GroundTruth::Scalar(i64::from(degrees)),
        }
    }

    /// Taller-neighbors puzzle over the given bar heights.
    #[must_use]
    pub fn taller_neighbors(heights: Vec<i32>) -> Self {
        let truth = GroundTruth::Counts(taller_neighbor_counts(&heights));
        Self {
            payload: PuzzlePayload::Bars { heights },
            truth,
        }
    }

    /// Valley-finding puzzle over a grid.
    #[must_use]
    pub fn number_valley(grid: Grid) -> Self {
        let truth = GroundTruth::Cells(grid.valleys());
        Self {
            payload: PuzzlePayload::Grid(grid),
            truth,
        }
    }

    /// Ordering puzzle; the truth is the presentation sorted ascending.
    #[must_use]
    pub fn alphabet_order(presentation: Vec<char>) -> Self {
        let mut sorted = presentation.clone();
        sorted.sort_unstable();
        Self {
            payload: PuzzlePayload::Symbols { presentation },
            truth: GroundTruth::Sequence(sorted),
        }
    }

    /// Truth-table puzzle for a shape and its three operators.
    #[must_use]
    pub fn truth_table(shape: Shape, ops: [Operator; 3]) -> Self {
        let expr = Expr::from_shape(shape, ops);
        let truth = GroundTruth::Table(expr.truth_table().to_vec());
        Self {
            payload: PuzzlePayload::Expression { shape, expr },
            truth,
        }
    }

    /// Kind of this puzzle.
    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        match self.payload {
            PuzzlePayload::Angle { .. } => PuzzleKind::AngleEstimate,
            PuzzlePayload::Bars { .. } => PuzzleKind::TallerNeighbors,
            PuzzlePayload::Grid(_) => PuzzleKind::NumberValley,
            PuzzlePayload::Symbols { .. } => PuzzleKind::AlphabetOrder,
            PuzzlePayload::Expression { .. } => PuzzleKind::TruthTable,
        }
    }

    /// What the participant is shown.
    #[must_use]
    pub fn payload(&self) -> &PuzzlePayload {
        &self.payload
    }

    /// The correct answer.
    #[must_use]
    pub fn ground_truth(&self) -> &GroundTruth {
        &self.truth
    }

    /// Number of answer positions (`0..answer_slots()`).
    #[must_use]
    pub fn answer_slots(&self) -> usize {
        match &self.payload {
            PuzzlePayload::Angle { .. } => 1,
            PuzzlePayload::Bars { heights } => heights.len(),
            PuzzlePayload::Grid(grid) => grid.len(),
            PuzzlePayload::Symbols { presentation } => presentation.len(),
            PuzzlePayload::Expression { .. } => ROW_COUNT,
        }
    }

    /// Truth-free view for display while the round is open.
    #[must_use]
    pub fn view(&self) -> PuzzleView<'_> {
        PuzzleView { puzzle: self }
    }
}

/// Read-only view of a puzzle that does not expose its ground truth.
#[derive(Clone, Copy, Debug)]
pub struct PuzzleView<'a> {
    puzzle: &'a Puzzle,
}

impl<'a> PuzzleView<'a> {
    /// Kind of the underlying puzzle.
    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        self.puzzle.kind()
    }

    /// What the participant is shown.
    #[must_use]
    pub fn payload(&self) -> &'a PuzzlePayload {
        &self.puzzle.payload
    }

    /// Number of answer positions.
    #[must_use]
    pub fn answer_slots(&self) -> usize {
        self.puzzle.answer_slots()
    }
}
