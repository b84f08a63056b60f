//! Answer evaluation.
//!
//! `evaluate` is a pure function of a puzzle and one participant's answer
//! sheet. The evaluation mode follows the puzzle kind:
//!
//! | mode           | kinds                                        | result                   |
//! |----------------|----------------------------------------------|--------------------------|
//! | Difference     | angle estimate                               | absolute error           |
//! | Classification | taller neighbors, number valley, truth table | per-position `Verdict`   |
//! | Outcome        | alphabet order                               | whole-answer win or lose |
//!
//! Evaluation never fails. Malformed input is coerced: a missing or
//! unreadable guess counts as 0 in difference mode, a missing
//! classification answer is `Missed`, an unreadable one `Incorrect`.

mod input;

pub use input::{AnswerSheet, RawInput};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::EvaluationMode;
use crate::puzzle::{GroundTruth, Puzzle};

/// Classification of one answer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Verdict {
    #[display("correct")]
    Correct,
    #[display("incorrect")]
    Incorrect,
    /// A response was required but none was given.
    #[display("missed")]
    Missed,
}

/// Single win/lose outcome of an ordering round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RoundOutcome {
    #[display("win")]
    Win,
    #[display("lose")]
    Lose,
}

/// Verdict counts for a result summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: usize,
    pub incorrect: usize,
    pub missed: usize,
}

impl Tally {
    fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Incorrect => self.incorrect += 1,
            Verdict::Missed => self.missed += 1,
        }
    }
}

/// Result of evaluating one participant's answers for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Estimation result. `guess` is `None` when nothing readable was
    /// submitted, in which case 0 was used.
    Difference {
        truth: i64,
        guess: Option<i64>,
        difference: u64,
    },
    /// One entry per answer position. `None` marks a position that needed
    /// no response and got none (an unselected non-valley cell).
    Classified {
        items: SmallVec<[Option<Verdict>; 16]>,
    },
    /// Whole-answer outcome.
    Outcome(RoundOutcome),
}

impl Evaluation {
    #[must_use]
    pub fn mode(&self) -> EvaluationMode {
        match self {
            Evaluation::Difference { .. } => EvaluationMode::Difference,
            Evaluation::Classified { .. } => EvaluationMode::Classification,
            Evaluation::Outcome(_) => EvaluationMode::Outcome,
        }
    }

    /// Numeric error, for difference evaluations.
    #[must_use]
    pub fn difference(&self) -> Option<u64> {
        match self {
            Evaluation::Difference { difference, .. } => Some(*difference),
            _ => None,
        }
    }

    /// Per-position verdicts, empty unless classified.
    #[must_use]
    pub fn verdicts(&self) -> &[Option<Verdict>] {
        match self {
            Evaluation::Classified { items } => items,
            _ => &[],
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self {
            Evaluation::Outcome(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// Number of correct positions. An outcome counts as one position.
    #[must_use]
    pub fn correct_count(&self) -> u64 {
        self.tally().correct as u64
    }

    /// Verdict counts. Difference evaluations have none.
    #[must_use]
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        match self {
            Evaluation::Difference { .. } => {}
            Evaluation::Classified { items } => items.iter().flatten().for_each(|v| tally.add(*v)),
            Evaluation::Outcome(RoundOutcome::Win) => tally.add(Verdict::Correct),
            Evaluation::Outcome(RoundOutcome::Lose) => tally.add(Verdict::Incorrect),
        }
        tally
    }
}

/// Evaluate one participant's sheet against the puzzle's ground truth.
#[must_use]
pub fn evaluate(puzzle: &Puzzle, answers: &AnswerSheet) -> Evaluation {
    match puzzle.ground_truth() {
        GroundTruth::Scalar(truth) => {
            let guess = answers.answered(0).and_then(RawInput::as_integer);
            Evaluation::Difference {
                truth: *truth,
                guess,
                difference: guess.unwrap_or(0).abs_diff(*truth),
            }
        }
        GroundTruth::Counts(counts) => classify(counts.len(), |position| {
            let expected = i64::from(counts[position]);
            Some(match answers.answered(position) {
                None => Verdict::Missed,
                Some(input) if input.as_integer() == Some(expected) => Verdict::Correct,
                Some(_) => Verdict::Incorrect,
            })
        }),
        GroundTruth::Cells(valleys) => classify(valleys.len(), |position| {
            let selected = match answers.answered(position).map(RawInput::as_flag) {
                None => false,
                Some(Some(flag)) => flag,
                Some(None) => return Some(Verdict::Incorrect),
            };
            match (selected, valleys[position]) {
                (true, true) => Some(Verdict::Correct),
                (true, false) => Some(Verdict::Incorrect),
                (false, true) => Some(Verdict::Missed),
                (false, false) => None,
            }
        }),
        GroundTruth::Table(rows) => classify(rows.len(), |position| {
            Some(match answers.answered(position) {
                None => Verdict::Missed,
                Some(input) if input.as_flag() == Some(rows[position]) => Verdict::Correct,
                Some(_) => Verdict::Incorrect,
            })
        }),
        GroundTruth::Sequence(sorted) => {
            let submitted: Vec<Option<char>> = (0..sorted.len())
                .map(|position| answers.answered(position).and_then(RawInput::as_symbol))
                .collect();
            Evaluation::Outcome(resolve_outcome(sorted, &submitted))
        }
    }
}

fn classify(len: usize, verdict_at: impl Fn(usize) -> Option<Verdict>) -> Evaluation {
    Evaluation::Classified {
        items: (0..len).map(verdict_at).collect(),
    }
}

/// `Win` iff every slot is filled and the submission equals the symbols
/// sorted ascending.
#[must_use]
pub fn resolve_outcome(symbols: &[char], submitted: &[Option<char>]) -> RoundOutcome {
    let mut expected = symbols.to_vec();
    expected.sort_unstable();

    let matches = expected.len() == submitted.len()
        && expected.iter().zip(submitted).all(|(want, got)| Some(*want) == *got);

    if matches {
        RoundOutcome::Win
    } else {
        RoundOutcome::Lose
    }
}
