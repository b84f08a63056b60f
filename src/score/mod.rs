//! Cumulative scores and the end-of-game winner.
//!
//! Scores only grow. In difference mode a score is accumulated error, so
//! lower is better; in classification mode it counts correct positions;
//! in outcome mode it counts won rounds.

use serde::{Deserialize, Serialize};

use crate::core::{EvaluationMode, ParticipantId, ParticipantMap};
use crate::eval::{Evaluation, RoundOutcome};

/// Points an evaluation adds to its participant's score.
#[must_use]
pub fn points(evaluation: &Evaluation) -> u64 {
    match evaluation {
        Evaluation::Difference { difference, .. } => *difference,
        Evaluation::Classified { .. } => evaluation.correct_count(),
        Evaluation::Outcome(RoundOutcome::Win) => 1,
        Evaluation::Outcome(RoundOutcome::Lose) => 0,
    }
}

/// Fold one participant's evaluation into the previous scores.
///
/// Returns a new map; `previous` is left untouched. Participants not in
/// the map are ignored.
#[must_use]
pub fn fold(
    previous: &ParticipantMap<u64>,
    participant: ParticipantId,
    evaluation: &Evaluation,
) -> ParticipantMap<u64> {
    let mut next = previous.clone();
    if let Some(score) = next.get_mut(participant) {
        *score = score.saturating_add(points(evaluation));
    }
    next
}

/// Winner of a finished game.
///
/// Only difference-mode games have a cross-round winner: the lowest
/// cumulative score, ties going to the lowest participant number.
/// Classification and outcome games stand round by round and yield `None`.
#[must_use]
pub fn resolve_winner(scores: &ParticipantMap<u64>, mode: EvaluationMode) -> Option<ParticipantId> {
    match mode {
        EvaluationMode::Difference => scores
            .iter()
            .min_by_key(|(participant, score)| (**score, *participant))
            .map(|(participant, _)| participant),
        EvaluationMode::Classification | EvaluationMode::Outcome => None,
    }
}

/// Cumulative scores for a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    scores: ParticipantMap<u64>,
}

impl Scoreboard {
    /// All participants at zero.
    #[must_use]
    pub fn new(participant_count: usize) -> Self {
        Self {
            scores: ParticipantMap::with_value(participant_count, 0),
        }
    }

    #[must_use]
    pub fn score(&self, participant: ParticipantId) -> Option<u64> {
        self.scores.get(participant).copied()
    }

    #[must_use]
    pub fn scores(&self) -> &ParticipantMap<u64> {
        &self.scores
    }

    /// Apply one participant's evaluation.
    pub fn record(&mut self, participant: ParticipantId, evaluation: &Evaluation) {
        self.scores = fold(&self.scores, participant, evaluation);
    }

    #[must_use]
    pub fn winner(&self, mode: EvaluationMode) -> Option<ParticipantId> {
        resolve_winner(&self.scores, mode)
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::eval::Verdict;

    fn difference(difference: u64) -> Evaluation {
        Evaluation::Difference {
            truth: 0,
            guess: None,
            difference,
        }
    }

    #[test]
    fn test_fold_difference() {
        let scores = ParticipantMap::with_value(2, 0);
        let p2 = ParticipantId::new(2);

        let next = fold(&scores, p2, &difference(45));

        assert_eq!(next[p2], 45);
        assert_eq!(next[ParticipantId::new(1)], 0);
        assert_eq!(scores[p2], 0, "previous scores must be unchanged");
    }

    #[test]
    fn test_fold_classification_counts_correct() {
        let eval = Evaluation::Classified {
            items: smallvec![
                Some(Verdict::Correct),
                None,
                Some(Verdict::Missed),
                Some(Verdict::Correct),
            ],
        };
        let next = fold(&ParticipantMap::with_value(1, 3), ParticipantId::new(1), &eval);
        assert_eq!(next[ParticipantId::new(1)], 5);
    }

    #[test]
    fn test_fold_outcome() {
        let p1 = ParticipantId::new(1);
        let scores = ParticipantMap::with_value(1, 0);

        let won = fold(&scores, p1, &Evaluation::Outcome(RoundOutcome::Win));
        let lost = fold(&scores, p1, &Evaluation::Outcome(RoundOutcome::Lose));

        assert_eq!(won[p1], 1);
        assert_eq!(lost[p1], 0);
    }

    #[test]
    fn test_fold_unknown_participant_ignored() {
        let scores = ParticipantMap::with_value(2, 7);
        let next = fold(&scores, ParticipantId::new(9), &difference(10));
        assert_eq!(next, scores);
    }

    #[test]
    fn test_lowest_score_wins() {
        let mut scores = ParticipantMap::with_value(3, 0);
        scores[ParticipantId::new(1)] = 40;
        scores[ParticipantId::new(2)] = 12;
        scores[ParticipantId::new(3)] = 30;

        assert_eq!(
            resolve_winner(&scores, EvaluationMode::Difference),
            Some(ParticipantId::new(2))
        );
    }

    #[test]
    fn test_ties_favor_lowest_participant() {
        let mut scores = ParticipantMap::with_value(3, 20);
        scores[ParticipantId::new(1)] = 25;

        assert_eq!(
            resolve_winner(&scores, EvaluationMode::Difference),
            Some(ParticipantId::new(2))
        );

        let even = ParticipantMap::with_value(2, 20);
        assert_eq!(
            resolve_winner(&even, EvaluationMode::Difference),
            Some(ParticipantId::new(1))
        );
    }

    #[test]
    fn test_no_winner_outside_difference_mode() {
        let scores = ParticipantMap::with_value(2, 5);
        assert_eq!(resolve_winner(&scores, EvaluationMode::Classification), None);
        assert_eq!(resolve_winner(&scores, EvaluationMode::Outcome), None);
    }

    #[test]
    fn test_scoreboard_records() {
        let mut board = Scoreboard::new(2);
        let p1 = ParticipantId::new(1);
        let p2 = ParticipantId::new(2);

        board.record(p1, &difference(10));
        board.record(p2, &difference(4));
        board.record(p1, &difference(0));

        assert_eq!(board.score(p1), Some(10));
        assert_eq!(board.score(p2), Some(4));
        assert_eq!(board.score(ParticipantId::new(3)), None);
        assert_eq!(board.winner(EvaluationMode::Difference), Some(p2));
    }
}
